//! Small pure numeric helpers shared by the trend analyzer, forecaster,
//! and achievement scorer.

/// Ordinary least-squares line through `(x, y)` points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// OLS fit of y on x. Returns `None` with fewer than 2 points or when all
/// x values coincide (vertical line).
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let ss_xx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if ss_xx == 0.0 {
        return None;
    }
    let ss_xy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let slope = ss_xy / ss_xx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Standard deviation of the residuals from a fitted line; the dispersion
/// input to the achievement scorer.
pub fn residual_std_dev(points: &[(f64, f64)], fit: &LinearFit) -> f64 {
    let residuals: Vec<f64> = points.iter().map(|(x, y)| y - fit.value_at(*x)).collect();
    std_dev(&residuals)
}

pub fn clamp_rate(rate: f64) -> f64 {
    rate.clamp(0.0, 100.0)
}
