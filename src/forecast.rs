//! Forecaster: extrapolates an error-rate series with an OLS line over the
//! trailing window.

use crate::config::ForecastConfig;
use crate::core::stats;
use crate::trend::trailing_window;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    /// Regression value one period ahead, clamped to [0, 100].
    pub predicted_rate: f64,
    /// Regression value `horizon` periods ahead, clamped to [0, 100].
    pub w4_predicted_rate: f64,
    pub slope: f64,
    /// Standard deviation of the regression residuals; `None` when the
    /// series was too short to estimate one.
    pub dispersion: Option<f64>,
    pub low_confidence: bool,
}

/// Forecast from a chronological, non-empty rate series. Returns `None`
/// only when the series has no points at all; a single point degrades to a
/// flat, low-confidence forecast.
pub fn forecast(rates: &[f64], config: &ForecastConfig) -> Option<Forecast> {
    match rates {
        [] => None,
        [only] => Some(Forecast {
            predicted_rate: stats::clamp_rate(*only),
            w4_predicted_rate: stats::clamp_rate(*only),
            slope: 0.0,
            dispersion: None,
            low_confidence: true,
        }),
        _ => Some(fit_and_extrapolate(rates, config)),
    }
}

fn fit_and_extrapolate(rates: &[f64], config: &ForecastConfig) -> Forecast {
    let tail = trailing_window(rates, config.window);
    let points: Vec<(f64, f64)> = tail
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, *r))
        .collect();

    // Indices are distinct, so the fit cannot degenerate.
    let fit = stats::linear_fit(&points).unwrap_or(stats::LinearFit {
        slope: 0.0,
        intercept: points[points.len() - 1].1,
    });

    let last_index = (points.len() - 1) as f64;
    Forecast {
        predicted_rate: stats::clamp_rate(fit.value_at(last_index + 1.0)),
        w4_predicted_rate: stats::clamp_rate(fit.value_at(last_index + config.horizon as f64)),
        slope: fit.slope,
        dispersion: Some(stats::residual_std_dev(&points, &fit)),
        low_confidence: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ForecastConfig {
        ForecastConfig::default()
    }

    #[test]
    fn two_points_extend_the_line() {
        let f = forecast(&[10.0, 8.0], &config()).unwrap();
        assert!((f.predicted_rate - 6.0).abs() < 1e-9);
        assert!((f.w4_predicted_rate - 0.0).abs() < 1e-9); // clamped from 8 - 2*4
    }

    #[test]
    fn single_point_is_flat_and_low_confidence() {
        let f = forecast(&[12.5], &config()).unwrap();
        assert_eq!(f.predicted_rate, 12.5);
        assert_eq!(f.w4_predicted_rate, 12.5);
        assert!(f.low_confidence);
        assert!(f.dispersion.is_none());
    }

    #[test]
    fn empty_series_has_no_forecast() {
        assert!(forecast(&[], &config()).is_none());
    }

    #[test]
    fn forecasts_are_clamped() {
        let f = forecast(&[90.0, 95.0, 100.0], &config()).unwrap();
        assert!(f.predicted_rate <= 100.0);
        assert!(f.w4_predicted_rate <= 100.0);
    }

    #[test]
    fn window_caps_lookback() {
        let narrow = ForecastConfig {
            window: 2,
            ..ForecastConfig::default()
        };
        // Only the last two points feed the fit.
        let f = forecast(&[0.0, 0.0, 10.0, 8.0], &narrow).unwrap();
        assert!((f.predicted_rate - 6.0).abs() < 1e-9);
    }
}
