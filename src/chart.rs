use std::fmt;

use serde::Serialize;

use crate::analysis::indices::{IndexKind, IndexValues};
use crate::data::profile::{AltitudeRow, Profile};

// ---------------------------------------------------------------------------
// Series shapes handed to the plotting layer
// ---------------------------------------------------------------------------

/// Variable plotted against pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVariable {
    Temperature,
    DewPoint,
}

impl ProfileVariable {
    pub const ALL: [ProfileVariable; 2] = [ProfileVariable::Temperature, ProfileVariable::DewPoint];
}

impl fmt::Display for ProfileVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileVariable::Temperature => f.write_str("Temperature (°C)"),
            ProfileVariable::DewPoint => f.write_str("Dew Point (°C)"),
        }
    }
}

/// Long-form row: one variable at one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub pressure: f64,
    pub variable: ProfileVariable,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexBar {
    pub index: IndexKind,
    pub value: f64,
}

/// Everything the plots need for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub profile: Vec<ProfilePoint>,
    pub indices: Vec<IndexBar>,
    pub altitude: Option<Vec<AltitudeRow>>,
}

impl ChartData {
    pub fn build(
        profile: &Profile,
        values: &IndexValues,
        altitude: Option<&[AltitudeRow]>,
    ) -> Self {
        ChartData {
            profile: profile_series(profile),
            indices: index_summary(values),
            altitude: altitude.and_then(altitude_series),
        }
    }
}

/// Melt the profile into long form: every temperature row (surface to top),
/// then every dew-point row.
pub fn profile_series(profile: &Profile) -> Vec<ProfilePoint> {
    ProfileVariable::ALL
        .into_iter()
        .flat_map(|variable| {
            profile.rows().iter().map(move |row| ProfilePoint {
                pressure: row.pressure,
                variable,
                value: match variable {
                    ProfileVariable::Temperature => row.temperature,
                    ProfileVariable::DewPoint => row.dew_point,
                },
            })
        })
        .collect()
}

/// Points of one variable, in profile order.
pub fn points_for(series: &[ProfilePoint], variable: ProfileVariable) -> impl Iterator<Item = &ProfilePoint> {
    series.iter().filter(move |p| p.variable == variable)
}

/// K, LI, SI in that order.
pub fn index_summary(values: &IndexValues) -> Vec<IndexBar> {
    IndexKind::ALL
        .into_iter()
        .map(|index| IndexBar {
            index,
            value: values.get(index),
        })
        .collect()
}

/// Altitude series, or `None` when no rows survived cleaning.
pub fn altitude_series(rows: &[AltitudeRow]) -> Option<Vec<AltitudeRow>> {
    (!rows.is_empty()).then(|| rows.to_vec())
}
