/// Data layer: raw tables, loading, column roles and profile cleaning.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ columns   │  column names → ColumnRoleMap (user may override)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ profile   │  coerce, drop incomplete rows, sort by pressure → Profile
///   └──────────┘
/// ```

pub mod columns;
pub mod loader;
pub mod profile;
pub mod table;
