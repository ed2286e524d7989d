//! Target Comparator / Achievement Scorer.
//!
//! The gap is `predicted - target`; lower error rates are better, so a
//! positive gap means the group is off target. The probability is a bounded
//! squash of the gap against the history's dispersion: a confident miss
//! (large gap, tight history) drives it toward 0, a confident beat toward
//! 100, and a noisy history dampens it toward 50.

use crate::config::AchievementConfig;
use crate::core::{GroupKey, Period, RateKind, Target};

/// Probability in [0, 100] of meeting the target, given the signed gap and
/// the dispersion of the historical series.
pub fn achievement_probability(gap: f64, dispersion: f64, config: &AchievementConfig) -> f64 {
    let scaled = gap / (dispersion + config.delta);
    100.0 * (0.5 - 0.5 * scaled.tanh()).clamp(0.0, 1.0)
}

/// Score a forecast against a target rate. The engine feeds the horizon
/// forecast here (achievement means meeting the target by the horizon).
/// `dispersion` is the residual standard deviation from the forecaster;
/// `None` (history too short) falls back to the configured default.
pub fn score(
    forecast_rate: f64,
    target_rate: f64,
    dispersion: Option<f64>,
    config: &AchievementConfig,
) -> f64 {
    let dispersion = dispersion.unwrap_or(config.default_dispersion);
    achievement_probability(forecast_rate - target_rate, dispersion, config)
}

/// The target applying to a group and period: the nearest (smallest)
/// enclosing group-specific target, falling back to the nearest enclosing
/// global target. Ties on span go to the latest start.
pub fn resolve_target<'a>(
    targets: &'a [Target],
    group: &GroupKey,
    period: &Period,
) -> Option<&'a Target> {
    let enclosing: Vec<&Target> = targets.iter().filter(|t| t.encloses(period)).collect();

    let group_specific = nearest(
        enclosing
            .iter()
            .copied()
            .filter(|t| t.group.as_ref() == Some(group)),
    );
    group_specific.or_else(|| nearest(enclosing.iter().copied().filter(|t| t.group.is_none())))
}

/// The target rate for one series of a group, if any target applies.
pub fn resolve_target_rate(
    targets: &[Target],
    group: &GroupKey,
    period: &Period,
    kind: RateKind,
) -> Option<f64> {
    resolve_target(targets, group, period).map(|t| t.rate(kind))
}

fn nearest<'a>(candidates: impl Iterator<Item = &'a Target>) -> Option<&'a Target> {
    candidates.min_by(|a, b| {
        let span_a = a.period_end - a.period_start;
        let span_b = b.period_end - b.period_start;
        span_a
            .cmp(&span_b)
            .then(b.period_start.cmp(&a.period_start))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AchievementConfig {
        AchievementConfig::default()
    }

    #[test]
    fn zero_gap_is_fifty_fifty() {
        assert!((achievement_probability(0.0, 3.0, &config()) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn probability_decreases_with_gap() {
        let c = config();
        let mut last = 100.1;
        for gap in [-10.0, -2.0, 0.0, 2.0, 10.0] {
            let p = achievement_probability(gap, 3.0, &c);
            assert!(p < last, "probability not decreasing at gap {gap}");
            last = p;
        }
    }

    #[test]
    fn high_dispersion_dampens_toward_fifty() {
        let c = config();
        let tight = achievement_probability(5.0, 0.5, &c);
        let noisy = achievement_probability(5.0, 50.0, &c);
        assert!(tight < noisy);
        assert!((noisy - 50.0).abs() < 10.0);
    }

    #[test]
    fn flat_history_does_not_divide_by_zero() {
        let p = achievement_probability(2.0, 0.0, &config());
        assert!(p.is_finite());
        assert!((0.0..=100.0).contains(&p));
    }

    #[test]
    fn missing_dispersion_uses_default() {
        let c = config();
        let p = score(7.0, 5.0, None, &c);
        let expected = achievement_probability(2.0, c.default_dispersion, &c);
        assert_eq!(p, expected);
    }
}
