//! Optional TOML engine configuration.
//!
//! ```toml
//! [sentiment]
//! interpolation_radius = 3
//! extrapolation_radius = 3
//! integer_output = false
//!
//! [vaccination]
//! integer_output = true
//! ```
//!
//! Missing sections or fields fall back to `SeriesConfig::for_metric`.

use std::fmt::Debug;
use std::fs;
use std::ops::RangeBounds;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{Metric, SeriesConfig};
use crate::error::AppError;

/// Engine settings for both metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub sentiment: SeriesConfig,
    pub vaccination: SeriesConfig,
}

/// On-disk shape: every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    sentiment: RawSeries,
    vaccination: RawSeries,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSeries {
    interpolation_radius: Option<usize>,
    extrapolation_radius: Option<usize>,
    integer_output: Option<bool>,
}

impl RawSeries {
    fn resolve(self, metric: Metric) -> SeriesConfig {
        let defaults = SeriesConfig::for_metric(metric);
        SeriesConfig {
            interpolation_radius: self
                .interpolation_radius
                .unwrap_or(defaults.interpolation_radius),
            extrapolation_radius: self
                .extrapolation_radius
                .unwrap_or(defaults.extrapolation_radius),
            integer_output: self.integer_output.unwrap_or(defaults.integer_output),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sentiment: SeriesConfig::for_metric(Metric::Sentiment),
            vaccination: SeriesConfig::for_metric(Metric::Vaccination),
        }
    }
}

impl EngineConfig {
    /// Load and validate an [`EngineConfig`] from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::new(2, format!("Failed to read config '{}': {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)
            .map_err(|e| AppError::new(2, format!("Invalid config '{}': {e}", path.display())))?;
        log::info!("loaded engine config from {path:?}");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| AppError::new(2, e.to_string()))?;
        let config = EngineConfig {
            sentiment: raw.sentiment.resolve(Metric::Sentiment),
            vaccination: raw.vaccination.resolve(Metric::Vaccination),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn series_config(&self, metric: Metric) -> SeriesConfig {
        match metric {
            Metric::Sentiment => self.sentiment,
            Metric::Vaccination => self.vaccination,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for metric in [Metric::Sentiment, Metric::Vaccination] {
            let cfg = self.series_config(metric);
            check_num(cfg.interpolation_radius, 1..=365).map_err(|e| {
                AppError::new(2, format!("invalid {} interpolation_radius: {e}", metric.display_name()))
            })?;
            check_num(cfg.extrapolation_radius, 1..=365).map_err(|e| {
                AppError::new(2, format!("invalid {} extrapolation_radius: {e}", metric.display_name()))
            })?;
        }
        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<(), String>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        return Err(format!("number must be in the range {range:?}, but is {num:?}"));
    }
    Ok(())
}
