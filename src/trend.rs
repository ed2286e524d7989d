//! Trend Analyzer: classifies the direction of an error-rate series.
//!
//! Error rates fall when things improve, so a negative slope classifies as
//! improving.

use crate::core::stats;
use crate::core::TrendDirection;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// Fitted slope in percentage points per period.
    pub slope: f64,
    /// Latest rate minus the one before it.
    pub delta: f64,
    /// Set when fewer than 2 usable points were available.
    pub low_confidence: bool,
}

/// Classify a slope against the configured sensitivity.
pub fn classify(slope: f64, epsilon: f64) -> TrendDirection {
    if slope.abs() < epsilon {
        TrendDirection::Stable
    } else if slope < 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Worsening
    }
}

/// Analyze a chronological series of rates (empty periods already removed).
/// The slope is the OLS slope over the trailing `window` points.
pub fn analyze(rates: &[f64], epsilon: f64, window: usize) -> TrendAnalysis {
    if rates.len() < 2 {
        return TrendAnalysis {
            direction: TrendDirection::Stable,
            slope: 0.0,
            delta: 0.0,
            low_confidence: true,
        };
    }

    let tail = trailing_window(rates, window);
    let points: Vec<(f64, f64)> = tail
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, *r))
        .collect();
    let slope = stats::linear_fit(&points).map(|fit| fit.slope).unwrap_or(0.0);

    TrendAnalysis {
        direction: classify(slope, epsilon),
        slope,
        delta: rates[rates.len() - 1] - rates[rates.len() - 2],
        low_confidence: false,
    }
}

pub(crate) fn trailing_window(rates: &[f64], window: usize) -> &[f64] {
    let start = rates.len().saturating_sub(window);
    &rates[start..]
}
