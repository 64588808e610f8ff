use serde::Serialize;

use super::classify::{classify, Classification};
use super::indices::{evaluate, IndexLibrary, IndexValues};
use super::AnalysisError;
use crate::chart::ChartData;
use crate::data::columns::{ColumnRole, ColumnRoleMap};
use crate::data::profile::{build_altitude_series, build_profile, AltitudeRow, Profile};
use crate::data::table::RawTable;

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

/// Index-dependent results, only produced when every index evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexReport {
    pub values: IndexValues,
    pub classification: Classification,
    pub charts: ChartData,
}

/// Result of one pass over an uploaded table.
///
/// The profile (and altitude series) survive an index failure so the raw
/// profile can still be shown and plotted.
#[derive(Debug)]
pub struct Analysis {
    pub profile: Profile,
    pub altitude: Option<Vec<AltitudeRow>>,
    pub indices: Result<IndexReport, AnalysisError>,
}

impl Analysis {
    pub fn report(&self) -> Option<&IndexReport> {
        self.indices.as_ref().ok()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run inference-resolved roles through profile building, index evaluation,
/// classification and chart shaping.
///
/// Unresolved columns and an empty profile halt the pass with `Err`. An index
/// failure is kept inside [`Analysis::indices`].
pub fn analyze(
    table: &RawTable,
    roles: &ColumnRoleMap,
    library: &dyn IndexLibrary,
) -> Result<Analysis, AnalysisError> {
    let (Some(temperature), Some(dew_point), Some(pressure)) = (
        roles.get(ColumnRole::Temperature),
        roles.get(ColumnRole::DewPoint),
        roles.get(ColumnRole::Pressure),
    ) else {
        return Err(AnalysisError::UnresolvedColumns(roles.missing_required()));
    };

    let profile = build_profile(table, temperature, dew_point, pressure)?;
    if profile.is_empty() {
        log::warn!("All rows dropped while cleaning the profile");
        return Err(AnalysisError::EmptyProfile);
    }

    // Altitude is optional: an unusable column only hides its plot.
    let altitude = roles
        .get(ColumnRole::Altitude)
        .and_then(|alt| match build_altitude_series(table, alt, temperature) {
            Ok(rows) => Some(rows),
            Err(e) => {
                log::warn!("Skipping altitude series: {e}");
                None
            }
        });

    let indices = evaluate(library, &profile).map(|values| {
        let classification = classify(&values);
        let charts = ChartData::build(&profile, &values, altitude.as_deref());
        IndexReport {
            values,
            classification,
            charts,
        }
    });

    match &indices {
        Ok(report) => log::info!(
            "Analysed {} levels: K={:.1} LI={:.1} SI={:.1} -> {:?}",
            profile.len(),
            report.values.k,
            report.values.li,
            report.values.si,
            report.classification.overall
        ),
        Err(e) => log::warn!("Index computation failed: {e}"),
    }

    Ok(Analysis {
        profile,
        altitude,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify::ThunderstormLikelihood;
    use crate::analysis::indices::tests::StubLibrary;
    use crate::analysis::indices::{IndexError, IndexKind};
    use crate::data::columns::infer_roles;
    use crate::data::table::Cell;

    fn s(v: &str) -> Cell {
        Cell::String(v.to_string())
    }

    fn sounding(rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable::from_rows(
            vec![
                "Derived Pressure".into(),
                "Temperature".into(),
                "Dew Point".into(),
                "Altitude".into(),
            ],
            rows,
        )
    }

    fn three_levels() -> RawTable {
        sounding(vec![
            vec![s("1000"), s("25"), s("20"), s("100")],
            vec![s("850"), s("15"), s("10"), s("1500")],
            vec![s("500"), s("-10"), s("-30"), s("5600")],
        ])
    }

    #[test]
    fn moderate_scenario_end_to_end() {
        let table = three_levels();
        let roles = infer_roles(&table.column_names());
        let lib = StubLibrary::scalars(30.0, -4.0, 0.0);

        let analysis = analyze(&table, &roles, &lib).unwrap();
        let report = analysis.report().unwrap();
        assert_eq!(report.classification.overall, ThunderstormLikelihood::Moderate);
        assert_eq!(report.classification.k.label(), "moderate");
        assert_eq!(report.classification.li.label(), "moderately unstable");
        assert_eq!(report.classification.si.label(), "moderately unstable");
        assert_eq!(report.charts.profile.len(), 6);
        assert_eq!(report.charts.indices.len(), 3);
        assert_eq!(report.charts.altitude.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn blank_dew_point_column_halts_before_indices() {
        let table = sounding(vec![
            vec![s("1000"), s("25"), s(""), s("100")],
            vec![s("850"), s("15"), Cell::Null, s("1500")],
        ]);
        let roles = infer_roles(&table.column_names());
        let lib = StubLibrary::scalars(30.0, -4.0, 0.0);

        let err = analyze(&table, &roles, &lib).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyProfile));
        assert_eq!(
            err.to_string(),
            "No valid numeric data found in selected columns. Check mapping."
        );
    }

    #[test]
    fn library_failure_keeps_profile_and_skips_classification() {
        let table = sounding(vec![vec![s("1000"), s("25"), s("20"), s("100")]]);
        let roles = infer_roles(&table.column_names());
        let lib = StubLibrary::scalars(30.0, -4.0, 0.0);

        let analysis = analyze(&table, &roles, &lib).unwrap();
        assert_eq!(analysis.profile.len(), 1);
        assert!(analysis.report().is_none());
        match analysis.indices {
            Err(AnalysisError::IndexComputation { index, source }) => {
                assert_eq!(index, IndexKind::KIndex);
                assert_eq!(source, IndexError::InsufficientLevels { found: 1, needed: 2 });
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(analysis.altitude.map(|a| a.len()), Some(1));
    }

    #[test]
    fn unresolved_roles_halt_before_profile() {
        let table = RawTable::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![s("1"), s("2")]],
        );
        let roles = infer_roles(&table.column_names());
        let lib = StubLibrary::scalars(30.0, -4.0, 0.0);

        let err = analyze(&table, &roles, &lib).unwrap_err();
        assert!(matches!(err, AnalysisError::UnresolvedColumns(ref r) if r == &[ColumnRole::Pressure]));
        assert_eq!(err.to_string(), "No usable data: no column selected for pressure");
    }

    #[test]
    fn altitude_skipped_when_not_selected() {
        let table = three_levels();
        let mut roles = infer_roles(&table.column_names());
        roles.set(ColumnRole::Altitude, None);
        let lib = StubLibrary::scalars(40.0, 2.0, 5.0);

        let analysis = analyze(&table, &roles, &lib).unwrap();
        assert!(analysis.altitude.is_none());
        let report = analysis.report().unwrap();
        assert_eq!(report.charts.altitude, None);
        assert_eq!(report.classification.overall, ThunderstormLikelihood::High);
    }

    #[test]
    fn overridden_column_that_does_not_exist_is_reported() {
        let table = three_levels();
        let mut roles = infer_roles(&table.column_names());
        roles.set(ColumnRole::Pressure, Some("Pressure (mb)".into()));
        let lib = StubLibrary::scalars(30.0, -4.0, 0.0);

        let err = analyze(&table, &roles, &lib).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(_)));
    }

    #[test]
    fn missing_altitude_column_only_drops_altitude() {
        let table = RawTable::from_rows(
            vec!["Pressure".into(), "Temperature".into(), "Dew Point".into()],
            vec![
                vec![s("1000"), s("25"), s("20")],
                vec![s("850"), s("15"), s("10")],
            ],
        );
        let mut roles = infer_roles(&table.column_names());
        roles.set(ColumnRole::Altitude, Some("Altitude".into()));
        let lib = StubLibrary::scalars(30.0, -4.0, 0.0);

        let analysis = analyze(&table, &roles, &lib).unwrap();
        assert!(analysis.altitude.is_none());
        let report = analysis.report().unwrap();
        assert_eq!(report.classification.overall, ThunderstormLikelihood::Moderate);
        assert_eq!(report.charts.altitude, None);
    }
}
