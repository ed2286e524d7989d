use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Trend classification tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Sensitivity in percentage points per period: slopes within ±epsilon
    /// classify as stable.
    #[serde(default = "default_trend_epsilon")]
    pub epsilon: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            epsilon: default_trend_epsilon(),
        }
    }
}

/// Forecast regression tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Maximum number of trailing periods fed into the regression.
    #[serde(default = "default_forecast_window")]
    pub window: usize,

    /// Long-horizon offset in periods for the secondary forecast.
    #[serde(default = "default_forecast_horizon")]
    pub horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: default_forecast_window(),
            horizon: default_forecast_horizon(),
        }
    }
}

/// Achievement-probability formula constants. The formula is
/// `100 * clamp01(0.5 - 0.5 * tanh(gap / (dispersion + delta)))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementConfig {
    /// Added to the dispersion so a flat history never divides by zero.
    #[serde(default = "default_achievement_delta")]
    pub delta: f64,

    /// Dispersion assumed when the history is too short to estimate one
    /// (fewer than 2 points).
    #[serde(default = "default_dispersion")]
    pub default_dispersion: f64,
}

impl Default for AchievementConfig {
    fn default() -> Self {
        Self {
            delta: default_achievement_delta(),
            default_dispersion: default_dispersion(),
        }
    }
}

/// Watchlist tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// Number of agents returned when the caller does not override it.
    #[serde(default = "default_watchlist_size")]
    pub default_size: usize,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            default_size: default_watchlist_size(),
        }
    }
}

/// All engine tunables. Passed explicitly to the engine; there is no global
/// configuration singleton.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub achievement: AchievementConfig,

    #[serde(default)]
    pub watchlist: WatchlistConfig,
}

impl EngineConfig {
    /// Load from a TOML file; absent keys fall back to defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| EngineError::config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for validation in self.collect_validations() {
            validation?;
        }
        Ok(())
    }

    fn collect_validations(&self) -> Vec<Result<(), EngineError>> {
        vec![
            Self::validate_positive(self.trend.epsilon, "trend.epsilon"),
            Self::validate_min_usize(self.forecast.window, 2, "forecast.window"),
            Self::validate_min_usize(self.forecast.horizon, 1, "forecast.horizon"),
            Self::validate_positive(self.achievement.delta, "achievement.delta"),
            Self::validate_non_negative(
                self.achievement.default_dispersion,
                "achievement.default_dispersion",
            ),
            Self::validate_min_usize(self.watchlist.default_size, 1, "watchlist.default_size"),
        ]
    }

    fn validate_positive(value: f64, name: &str) -> Result<(), EngineError> {
        if value > 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(EngineError::config(format!("{name} must be positive")))
        }
    }

    fn validate_non_negative(value: f64, name: &str) -> Result<(), EngineError> {
        if value >= 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(EngineError::config(format!("{name} must be >= 0")))
        }
    }

    fn validate_min_usize(value: usize, min: usize, name: &str) -> Result<(), EngineError> {
        if value >= min {
            Ok(())
        } else {
            Err(EngineError::config(format!("{name} must be >= {min}")))
        }
    }
}

fn default_trend_epsilon() -> f64 {
    0.3 // ±0.3 percentage points per period counts as flat
}

fn default_forecast_window() -> usize {
    8 // trailing periods fed to the regression
}

fn default_forecast_horizon() -> usize {
    4
}

fn default_achievement_delta() -> f64 {
    1.0
}

fn default_dispersion() -> f64 {
    5.0 // percentage points, used when history is too short
}

fn default_watchlist_size() -> usize {
    5
}
