use serde::Serialize;

use super::table::{Cell, Column, RawTable};
use crate::analysis::AnalysisError;
use crate::units::{Celsius, Hectopascals};

// ---------------------------------------------------------------------------
// Profile – cleaned, surface-to-top sounding
// ---------------------------------------------------------------------------

/// One level of the sounding. All fields are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileRow {
    /// hPa
    pub pressure: f64,
    /// °C
    pub temperature: f64,
    /// °C
    pub dew_point: f64,
}

/// Levels ordered by non-increasing pressure (surface first).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    rows: Vec<ProfileRow>,
}

impl Profile {
    pub fn rows(&self) -> &[ProfileRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pressures(&self) -> Vec<Hectopascals> {
        self.rows.iter().map(|r| Hectopascals(r.pressure)).collect()
    }

    pub fn temperatures(&self) -> Vec<Celsius> {
        self.rows.iter().map(|r| Celsius(r.temperature)).collect()
    }

    pub fn dew_points(&self) -> Vec<Celsius> {
        self.rows.iter().map(|r| Celsius(r.dew_point)).collect()
    }

    /// Render the profile as a table with `pressure`, `temperature` and
    /// `dew_point` columns, for previews.
    pub fn to_table(&self) -> RawTable {
        let column = |name: &str, get: fn(&ProfileRow) -> f64| Column {
            name: name.to_string(),
            values: self.rows.iter().map(|r| Cell::Float(get(r))).collect(),
        };
        RawTable {
            columns: vec![
                column(PRESSURE_COLUMN, |r| r.pressure),
                column(TEMPERATURE_COLUMN, |r| r.temperature),
                column(DEW_POINT_COLUMN, |r| r.dew_point),
            ],
        }
    }
}

/// Column names used by [`Profile::to_table`].
pub const PRESSURE_COLUMN: &str = "pressure";
pub const TEMPERATURE_COLUMN: &str = "temperature";
pub const DEW_POINT_COLUMN: &str = "dew_point";

/// One (altitude, temperature) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AltitudeRow {
    pub altitude: f64,
    pub temperature: f64,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build a cleaned profile from three named columns.
///
/// Rows with any value that does not coerce to a finite number are dropped;
/// the rest are stably sorted by descending pressure. An empty result is not
/// an error here.
pub fn build_profile(
    table: &RawTable,
    temperature: &str,
    dew_point: &str,
    pressure: &str,
) -> Result<Profile, AnalysisError> {
    let t_col = project(table, temperature)?;
    let td_col = project(table, dew_point)?;
    let p_col = project(table, pressure)?;

    let n_rows = table.num_rows();
    let mut rows: Vec<ProfileRow> = (0..n_rows)
        .filter_map(|i| {
            Some(ProfileRow {
                pressure: coerce(p_col, i)?,
                temperature: coerce(t_col, i)?,
                dew_point: coerce(td_col, i)?,
            })
        })
        .collect();

    log::debug!(
        "Profile: kept {} of {n_rows} rows ({} dropped)",
        rows.len(),
        n_rows - rows.len()
    );

    // sort_by is stable: equal pressures keep their input order.
    rows.sort_by(|a, b| b.pressure.total_cmp(&a.pressure));

    Ok(Profile { rows })
}

/// Build (altitude, temperature) pairs in original row order.
pub fn build_altitude_series(
    table: &RawTable,
    altitude: &str,
    temperature: &str,
) -> Result<Vec<AltitudeRow>, AnalysisError> {
    let alt_col = project(table, altitude)?;
    let t_col = project(table, temperature)?;

    Ok((0..table.num_rows())
        .filter_map(|i| {
            Some(AltitudeRow {
                altitude: coerce(alt_col, i)?,
                temperature: coerce(t_col, i)?,
            })
        })
        .collect())
}

fn project<'a>(table: &'a RawTable, name: &str) -> Result<&'a Column, AnalysisError> {
    table
        .column(name)
        .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
}

fn coerce(column: &Column, row: usize) -> Option<f64> {
    column.values.get(row).and_then(Cell::as_f64)
}
