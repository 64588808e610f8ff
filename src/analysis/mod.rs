/// Analysis layer: index evaluation, classification and the per-upload
/// pipeline.
///
/// ```text
///   Profile
///      │
///      ▼
///   ┌──────────┐   IndexLibrary (trait)
///   │ indices  │ ◄──────────────── thermo::BuiltinIndices
///   └──────────┘
///      │ IndexValues
///      ▼
///   ┌──────────┐
///   │ classify │  thresholds → ThunderstormLikelihood + per-index categories
///   └──────────┘
/// ```
///
/// `pipeline` strings the stages together and converts every failure into a
/// single [`AnalysisError`].
pub mod classify;
pub mod indices;
pub mod pipeline;
pub mod thermo;

use thiserror::Error;

use crate::data::columns::ColumnRole;
use indices::{IndexError, IndexKind};

/// Terminal conditions of one pipeline pass. None of them are fatal to the
/// application; the `Display` text is the user-facing status message.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No usable data: no column selected for {}", join_roles(.0))]
    UnresolvedColumns(Vec<ColumnRole>),

    #[error("Column '{0}' does not exist in the uploaded table")]
    MissingColumn(String),

    #[error("No valid numeric data found in selected columns. Check mapping.")]
    EmptyProfile,

    #[error("Error calculating indices ({index}): {source}")]
    IndexComputation {
        index: IndexKind,
        #[source]
        source: IndexError,
    },
}

fn join_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
