//! Risk Classifier: maps achievement probability to discrete severity.
//!
//! Two scales coexist, inherited from the consuming surfaces: dashboards
//! color with the five `ColorBand`s, predictions carry the four
//! `RiskLevel`s. The collapse is defined here in one place: the top two
//! bands (achieved, on-track) both classify as low risk.

use crate::core::RiskLevel;
use serde::{Deserialize, Serialize};

/// Five-level band used by dashboard coloring.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ColorBand {
    Achieved,
    OnTrack,
    Caution,
    Warning,
    Risk,
}

impl ColorBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 80.0 {
            ColorBand::Achieved
        } else if probability >= 60.0 {
            ColorBand::OnTrack
        } else if probability >= 40.0 {
            ColorBand::Caution
        } else if probability >= 20.0 {
            ColorBand::Warning
        } else {
            ColorBand::Risk
        }
    }

    /// The four-level risk this band collapses to.
    pub fn risk_level(self) -> RiskLevel {
        match self {
            ColorBand::Achieved | ColorBand::OnTrack => RiskLevel::Low,
            ColorBand::Caution => RiskLevel::Medium,
            ColorBand::Warning => RiskLevel::High,
            ColorBand::Risk => RiskLevel::Critical,
        }
    }
}

impl std::fmt::Display for ColorBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(ColorBand, &str)] = &[
            (ColorBand::Achieved, "Achieved"),
            (ColorBand::OnTrack, "On Track"),
            (ColorBand::Caution, "Caution"),
            (ColorBand::Warning, "Warning"),
            (ColorBand::Risk, "Risk"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(b, _)| b == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Risk level for one achievement probability.
pub fn risk_level(probability: f64) -> RiskLevel {
    ColorBand::from_probability(probability).risk_level()
}

/// Overall group risk: the most severe of the per-category levels.
/// Categories without a target (no probability, no level) are skipped; a
/// group with no scored category defaults to low.
pub fn overall_risk(attitude: Option<RiskLevel>, operations: Option<RiskLevel>) -> RiskLevel {
    [attitude, operations]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(RiskLevel::Low)
}

pub fn alert_flag(overall: RiskLevel) -> bool {
    overall >= RiskLevel::High
}
