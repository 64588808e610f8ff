use serde::Serialize;

use super::indices::{IndexKind, IndexValues};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

const K_HIGH: f64 = 35.0;
const K_MODERATE: f64 = 25.0;
const K_WEAK: f64 = 20.0;

const LI_STRONG: f64 = -6.0;
const LI_MODERATE: f64 = -3.0;
const LI_STABLE: f64 = 0.0;

const SI_STRONG: f64 = -3.0;
const SI_MODERATE: f64 = 1.0;
const SI_STABLE: f64 = 3.0;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Overall chance of thunderstorms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThunderstormLikelihood {
    High,
    Moderate,
    Low,
}

impl ThunderstormLikelihood {
    pub fn headline(self) -> &'static str {
        match self {
            ThunderstormLikelihood::High => "High chance of thunderstorms",
            ThunderstormLikelihood::Moderate => "Moderate chance of thunderstorms",
            ThunderstormLikelihood::Low => "Low chance of thunderstorms",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KCategory {
    VeryLow,
    Weak,
    Moderate,
    High,
}

impl KCategory {
    pub fn label(self) -> &'static str {
        match self {
            KCategory::VeryLow => "very low potential",
            KCategory::Weak => "weak",
            KCategory::Moderate => "moderate",
            KCategory::High => "high",
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            KCategory::VeryLow => "Very low thunderstorm potential",
            KCategory::Weak => "Weak thunderstorm potential",
            KCategory::Moderate => "Moderate thunderstorm potential",
            KCategory::High => "High thunderstorm potential",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiftedCategory {
    Stable,
    SlightlyUnstable,
    ModeratelyUnstable,
    StronglyUnstable,
}

impl LiftedCategory {
    pub fn label(self) -> &'static str {
        match self {
            LiftedCategory::Stable => "stable",
            LiftedCategory::SlightlyUnstable => "slightly unstable",
            LiftedCategory::ModeratelyUnstable => "moderately unstable",
            LiftedCategory::StronglyUnstable => "strongly unstable",
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            LiftedCategory::Stable => "Stable atmosphere",
            LiftedCategory::SlightlyUnstable => "Slightly unstable",
            LiftedCategory::ModeratelyUnstable => "Moderately unstable",
            LiftedCategory::StronglyUnstable => {
                "Strongly unstable (favourable for deep convection)"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShowalterCategory {
    Stable,
    WeaklyUnstable,
    ModeratelyUnstable,
    StronglyUnstable,
}

impl ShowalterCategory {
    pub fn label(self) -> &'static str {
        match self {
            ShowalterCategory::Stable => "stable",
            ShowalterCategory::WeaklyUnstable => "weakly unstable",
            ShowalterCategory::ModeratelyUnstable => "moderately unstable",
            ShowalterCategory::StronglyUnstable => "strongly unstable",
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            ShowalterCategory::Stable => "Stable",
            ShowalterCategory::WeaklyUnstable => "Weakly unstable",
            ShowalterCategory::ModeratelyUnstable => "Moderately unstable",
            ShowalterCategory::StronglyUnstable => "Strongly unstable",
        }
    }
}

/// Overall assessment plus one independent descriptor per index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub overall: ThunderstormLikelihood,
    pub k: KCategory,
    pub li: LiftedCategory,
    pub si: ShowalterCategory,
}

impl Classification {
    /// Short descriptor of one index.
    pub fn label(&self, kind: IndexKind) -> &'static str {
        match kind {
            IndexKind::KIndex => self.k.label(),
            IndexKind::LiftedIndex => self.li.label(),
            IndexKind::ShowalterIndex => self.si.label(),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classify finite index values. Callers must not pass the result of a failed
/// index evaluation.
pub fn classify(values: &IndexValues) -> Classification {
    Classification {
        overall: overall(values.k, values.li, values.si),
        k: k_category(values.k),
        li: lifted_category(values.li),
        si: showalter_category(values.si),
    }
}

/// Any one index is enough to raise the assessment.
pub fn overall(k: f64, li: f64, si: f64) -> ThunderstormLikelihood {
    if k >= K_HIGH || li < LI_STRONG || si < SI_STRONG {
        ThunderstormLikelihood::High
    } else if (K_MODERATE..K_HIGH).contains(&k)
        || (LI_STRONG..LI_MODERATE).contains(&li)
        || (SI_STRONG..SI_MODERATE).contains(&si)
    {
        ThunderstormLikelihood::Moderate
    } else {
        ThunderstormLikelihood::Low
    }
}

pub fn k_category(k: f64) -> KCategory {
    if k < K_WEAK {
        KCategory::VeryLow
    } else if k < K_MODERATE {
        KCategory::Weak
    } else if k < K_HIGH {
        KCategory::Moderate
    } else {
        KCategory::High
    }
}

pub fn lifted_category(li: f64) -> LiftedCategory {
    if li > LI_STABLE {
        LiftedCategory::Stable
    } else if li >= LI_MODERATE {
        LiftedCategory::SlightlyUnstable
    } else if li >= LI_STRONG {
        LiftedCategory::ModeratelyUnstable
    } else {
        LiftedCategory::StronglyUnstable
    }
}

pub fn showalter_category(si: f64) -> ShowalterCategory {
    if si > SI_STABLE {
        ShowalterCategory::Stable
    } else if si >= SI_MODERATE {
        ShowalterCategory::WeaklyUnstable
    } else if si >= SI_STRONG {
        ShowalterCategory::ModeratelyUnstable
    } else {
        ShowalterCategory::StronglyUnstable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ThunderstormLikelihood::*;

    // LI and SI values that on their own stay in the Low band.
    const QUIET_LI: f64 = 1.0;
    const QUIET_SI: f64 = 4.0;

    #[test]
    fn k_boundaries() {
        assert_eq!(overall(35.0, QUIET_LI, QUIET_SI), High);
        assert_eq!(overall(34.999, QUIET_LI, QUIET_SI), Moderate);
        assert_eq!(overall(25.0, QUIET_LI, QUIET_SI), Moderate);
        assert_eq!(overall(24.999, QUIET_LI, QUIET_SI), Low);
    }

    #[test]
    fn li_boundaries() {
        assert_eq!(overall(0.0, -6.0, QUIET_SI), Moderate);
        assert_eq!(overall(0.0, -6.0001, QUIET_SI), High);
        assert_eq!(overall(0.0, -3.0001, QUIET_SI), Moderate);
        assert_eq!(overall(0.0, -3.0, QUIET_SI), Low);
    }

    #[test]
    fn si_boundaries() {
        assert_eq!(overall(0.0, QUIET_LI, -3.0), Moderate);
        assert_eq!(overall(0.0, QUIET_LI, -3.0001), High);
        assert_eq!(overall(0.0, QUIET_LI, 0.999), Moderate);
        assert_eq!(overall(0.0, QUIET_LI, 1.0), Low);
    }

    #[test]
    fn any_single_index_raises_the_assessment() {
        assert_eq!(overall(10.0, 5.0, -4.0), High);
        assert_eq!(overall(10.0, -7.0, 10.0), High);
        assert_eq!(overall(40.0, 5.0, 10.0), High);
        assert_eq!(overall(10.0, 5.0, 0.0), Moderate);
    }

    #[test]
    fn k_descriptor_bands() {
        assert_eq!(k_category(19.999), KCategory::VeryLow);
        assert_eq!(k_category(20.0), KCategory::Weak);
        assert_eq!(k_category(24.999), KCategory::Weak);
        assert_eq!(k_category(25.0), KCategory::Moderate);
        assert_eq!(k_category(34.999), KCategory::Moderate);
        assert_eq!(k_category(35.0), KCategory::High);
    }

    #[test]
    fn li_descriptor_bands() {
        assert_eq!(lifted_category(0.001), LiftedCategory::Stable);
        assert_eq!(lifted_category(0.0), LiftedCategory::SlightlyUnstable);
        assert_eq!(lifted_category(-3.0), LiftedCategory::SlightlyUnstable);
        assert_eq!(lifted_category(-3.001), LiftedCategory::ModeratelyUnstable);
        assert_eq!(lifted_category(-6.0), LiftedCategory::ModeratelyUnstable);
        assert_eq!(lifted_category(-6.001), LiftedCategory::StronglyUnstable);
    }

    #[test]
    fn si_descriptor_bands() {
        assert_eq!(showalter_category(3.001), ShowalterCategory::Stable);
        assert_eq!(showalter_category(3.0), ShowalterCategory::WeaklyUnstable);
        assert_eq!(showalter_category(1.0), ShowalterCategory::WeaklyUnstable);
        assert_eq!(showalter_category(0.999), ShowalterCategory::ModeratelyUnstable);
        assert_eq!(showalter_category(-3.0), ShowalterCategory::ModeratelyUnstable);
        assert_eq!(showalter_category(-3.001), ShowalterCategory::StronglyUnstable);
    }

    #[test]
    fn classify_combines_all_four() {
        let c = classify(&IndexValues {
            k: 30.0,
            li: -4.0,
            si: 0.0,
        });
        assert_eq!(c.overall, Moderate);
        assert_eq!(c.k.label(), "moderate");
        assert_eq!(c.li.label(), "moderately unstable");
        assert_eq!(c.si.label(), "moderately unstable");
        assert_eq!(c.label(IndexKind::LiftedIndex), "moderately unstable");
    }
}
