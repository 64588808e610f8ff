use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::AnalysisError;
use crate::data::profile::Profile;
use crate::units::{Celsius, Hectopascals};

// ---------------------------------------------------------------------------
// Index library boundary
// ---------------------------------------------------------------------------

/// The three convective indices, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IndexKind {
    KIndex,
    LiftedIndex,
    ShowalterIndex,
}

impl IndexKind {
    pub const ALL: [IndexKind; 3] = [
        IndexKind::KIndex,
        IndexKind::LiftedIndex,
        IndexKind::ShowalterIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndexKind::KIndex => "K-Index",
            IndexKind::LiftedIndex => "Lifted Index",
            IndexKind::ShowalterIndex => "Showalter Index",
        }
    }

    /// Name with abbreviation, for metric headers.
    pub fn title(self) -> &'static str {
        match self {
            IndexKind::KIndex => "K-Index",
            IndexKind::LiftedIndex => "Lifted Index (LI)",
            IndexKind::ShowalterIndex => "Showalter Index (SI)",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw output of an index function: one value or one candidate per level.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutput {
    Scalar(f64),
    Levels(Vec<f64>),
}

impl IndexOutput {
    /// Reduce to one representative value. Arrays collapse to the mean of
    /// their finite entries; `None` when nothing finite remains.
    pub fn reduce(&self) -> Option<f64> {
        match self {
            IndexOutput::Scalar(v) => v.is_finite().then_some(*v),
            IndexOutput::Levels(values) => {
                let (sum, count) = values
                    .iter()
                    .filter(|v| v.is_finite())
                    .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                (count > 0).then(|| sum / count as f64)
            }
        }
    }
}

/// Failure reported by an index function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("profile has {found} levels, at least {needed} required")]
    InsufficientLevels { found: usize, needed: usize },

    #[error("pressure, temperature and dew point arrays differ in length")]
    LengthMismatch,

    #[error("{level} hPa is outside the profile's pressure range")]
    OutOfRange { level: f64 },

    #[error("no finite value produced")]
    Undefined,

    #[error("{0}")]
    Failed(String),
}

/// A meteorological library computing the three indices from a sounding
/// ordered surface first.
pub trait IndexLibrary {
    fn k_index(
        &self,
        pressure: &[Hectopascals],
        temperature: &[Celsius],
        dew_point: &[Celsius],
    ) -> Result<IndexOutput, IndexError>;

    fn lifted_index(
        &self,
        pressure: &[Hectopascals],
        temperature: &[Celsius],
        dew_point: &[Celsius],
    ) -> Result<IndexOutput, IndexError>;

    fn showalter_index(
        &self,
        pressure: &[Hectopascals],
        temperature: &[Celsius],
        dew_point: &[Celsius],
    ) -> Result<IndexOutput, IndexError>;
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// The three reduced, finite index values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexValues {
    pub k: f64,
    pub li: f64,
    pub si: f64,
}

impl IndexValues {
    pub fn get(&self, kind: IndexKind) -> f64 {
        match kind {
            IndexKind::KIndex => self.k,
            IndexKind::LiftedIndex => self.li,
            IndexKind::ShowalterIndex => self.si,
        }
    }
}

/// Run the library over a non-empty profile and reduce each index to a
/// scalar. The first failing index aborts the evaluation.
pub fn evaluate(
    library: &dyn IndexLibrary,
    profile: &Profile,
) -> Result<IndexValues, AnalysisError> {
    let p = profile.pressures();
    let t = profile.temperatures();
    let td = profile.dew_points();

    let compute = |kind: IndexKind| -> Result<f64, AnalysisError> {
        let output = match kind {
            IndexKind::KIndex => library.k_index(&p, &t, &td),
            IndexKind::LiftedIndex => library.lifted_index(&p, &t, &td),
            IndexKind::ShowalterIndex => library.showalter_index(&p, &t, &td),
        };
        output
            .and_then(|out| out.reduce().ok_or(IndexError::Undefined))
            .map_err(|source| AnalysisError::IndexComputation {
                index: kind,
                source,
            })
    };

    Ok(IndexValues {
        k: compute(IndexKind::KIndex)?,
        li: compute(IndexKind::LiftedIndex)?,
        si: compute(IndexKind::ShowalterIndex)?,
    })
}
