use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column roles
// ---------------------------------------------------------------------------

/// Physical meaning assigned to a raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ColumnRole {
    Temperature,
    DewPoint,
    Pressure,
    Altitude,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::Temperature,
        ColumnRole::DewPoint,
        ColumnRole::Pressure,
        ColumnRole::Altitude,
    ];

    /// Roles a profile cannot be built without.
    pub const REQUIRED: [ColumnRole; 3] = [
        ColumnRole::Temperature,
        ColumnRole::DewPoint,
        ColumnRole::Pressure,
    ];

    /// Lowercase substrings that claim a column for this role.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            ColumnRole::Temperature => &["temp"],
            ColumnRole::DewPoint => &["dew"],
            ColumnRole::Pressure => &["press"],
            ColumnRole::Altitude => &["alt", "height"],
        }
    }

    /// Column used when no name matches. Altitude has none.
    fn fallback_position(self) -> Option<usize> {
        match self {
            ColumnRole::Temperature => Some(0),
            ColumnRole::DewPoint => Some(1),
            ColumnRole::Pressure => Some(2),
            ColumnRole::Altitude => None,
        }
    }

    /// Selector label, with unit.
    pub fn label(self) -> &'static str {
        match self {
            ColumnRole::Temperature => "Temperature (°C)",
            ColumnRole::DewPoint => "Dew Point (°C)",
            ColumnRole::Pressure => "Pressure (hPa)",
            ColumnRole::Altitude => "Altitude (optional, m)",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Temperature => "temperature",
            ColumnRole::DewPoint => "dew point",
            ColumnRole::Pressure => "pressure",
            ColumnRole::Altitude => "altitude",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// ColumnRoleMap
// ---------------------------------------------------------------------------

/// Which column plays which role. `None` means unresolved (or "(None)" for
/// altitude). Duplicate assignments are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoleMap {
    pub temperature: Option<String>,
    pub dew_point: Option<String>,
    pub pressure: Option<String>,
    pub altitude: Option<String>,
}

impl ColumnRoleMap {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.slot(role).as_deref()
    }

    /// Replace the column for `role` (user override).
    pub fn set(&mut self, role: ColumnRole, column: Option<String>) {
        *self.slot_mut(role) = column;
    }

    /// Required roles that are still unresolved.
    pub fn missing_required(&self) -> Vec<ColumnRole> {
        ColumnRole::REQUIRED
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    fn slot(&self, role: ColumnRole) -> &Option<String> {
        match role {
            ColumnRole::Temperature => &self.temperature,
            ColumnRole::DewPoint => &self.dew_point,
            ColumnRole::Pressure => &self.pressure,
            ColumnRole::Altitude => &self.altitude,
        }
    }

    fn slot_mut(&mut self, role: ColumnRole) -> &mut Option<String> {
        match role {
            ColumnRole::Temperature => &mut self.temperature,
            ColumnRole::DewPoint => &mut self.dew_point,
            ColumnRole::Pressure => &mut self.pressure,
            ColumnRole::Altitude => &mut self.altitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Guess column roles from column names.
///
/// For every role the first column whose lowercased name contains one of the
/// role's keywords wins. Unmatched temperature / dew point / pressure fall
/// back to columns 0 / 1 / 2 when the table is wide enough; altitude stays
/// unresolved.
pub fn infer_roles<S: AsRef<str>>(column_names: &[S]) -> ColumnRoleMap {
    let lowered: Vec<String> = column_names
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();

    let mut roles = ColumnRoleMap::default();
    for role in ColumnRole::ALL {
        let matched = lowered
            .iter()
            .position(|name| role.keywords().iter().any(|kw| name.contains(kw)));

        let index = matched.or_else(|| {
            role.fallback_position()
                .filter(|&pos| pos < column_names.len())
        });

        roles.set(role, index.map(|i| column_names[i].as_ref().to_string()));
    }

    log::debug!("Inferred column roles: {roles:?}");
    roles
}
