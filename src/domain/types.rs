//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - passed between ingest, the gap-filling engine and the analysis pipeline
//! - exported to JSON/CSV

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One recorded `(date, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub value: f64,
}

impl Sample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Which of the two daily metrics a series describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Mean sentiment score of the day's posts.
    Sentiment,
    /// Daily vaccinations.
    Vaccination,
}

impl Metric {
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Sentiment => "sentiment",
            Metric::Vaccination => "vaccination",
        }
    }

    /// Default value column in the input CSV.
    pub fn default_column(self) -> &'static str {
        match self {
            Metric::Sentiment => "polarity",
            Metric::Vaccination => "daily_vaccinations",
        }
    }
}

/// Engine settings for one `MetricSeries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Neighbouring samples (each side) used to fit a gap between two samples.
    pub interpolation_radius: usize,
    /// Samples used to fit the line before the first / after the last sample.
    pub extrapolation_radius: usize,
    /// Round regression estimates to the nearest integer.
    pub integer_output: bool,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            interpolation_radius: 3,
            extrapolation_radius: 3,
            integer_output: false,
        }
    }
}

impl SeriesConfig {
    /// Defaults for a metric: counts (vaccinations) are reported as integers.
    pub fn for_metric(metric: Metric) -> Self {
        Self {
            integer_output: metric == Metric::Vaccination,
            ..Self::default()
        }
    }

    pub fn max_radius(&self) -> usize {
        self.interpolation_radius.max(self.extrapolation_radius)
    }
}

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days in the range (0 when `start > end`).
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    /// Last day of the first half of the range.
    pub fn midpoint(&self) -> NaiveDate {
        let half = (self.end - self.start).num_days() / 2;
        self.start + chrono::Duration::days(half)
    }
}

/// A parsed, region-resolved CSV observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    /// Two-letter region code (see `domain::region`).
    pub region: &'static str,
    pub value: f64,
}

/// Correlation between the two filled daily series of one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCorrelation {
    pub code: String,
    pub name: String,
    pub correlation: f64,
    /// Recorded (pre-averaging) observations behind each series.
    pub sentiment_samples: usize,
    pub vaccination_samples: usize,
}

/// A region present in both inputs whose correlation could not be computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRegion {
    pub code: String,
    pub reason: String,
}

/// Straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Vaccination-from-sentiment model fitted on the first half of the range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldoutModel {
    pub line: LineFit,
    /// Days used for fitting (first half).
    pub n_fit: usize,
    /// Days held out (second half).
    pub n_holdout: usize,
    pub rmse_fit: f64,
    /// `None` when the hold-out half is empty.
    pub rmse_holdout: Option<f64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags, the optional TOML engine config and defaults.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub sentiment_path: PathBuf,
    pub vaccination_path: PathBuf,
    pub sentiment_column: String,
    pub vaccination_column: String,

    pub range: DateRange,

    pub sentiment: SeriesConfig,
    pub vaccination: SeriesConfig,

    /// Regions listed at each end of the "notable regions" section.
    pub notable: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_daily: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn column(&self, metric: Metric) -> &str {
        match metric {
            Metric::Sentiment => &self.sentiment_column,
            Metric::Vaccination => &self.vaccination_column,
        }
    }

    pub fn path(&self, metric: Metric) -> &PathBuf {
        match metric {
            Metric::Sentiment => &self.sentiment_path,
            Metric::Vaccination => &self.vaccination_path,
        }
    }
}

/// Correlation export (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationFile {
    pub tool: String,
    pub range: DateRange,
    pub national: Option<f64>,
    pub regions: Vec<RegionCorrelation>,
    pub skipped: Vec<SkippedRegion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_length_and_midpoint() {
        let range = DateRange::new(day(2021, 2, 28), day(2021, 3, 9));
        assert_eq!(range.len_days(), 10);
        assert_eq!(range.midpoint(), day(2021, 3, 4));

        let single = DateRange::new(day(2021, 1, 1), day(2021, 1, 1));
        assert_eq!(single.len_days(), 1);
        assert_eq!(single.midpoint(), day(2021, 1, 1));

        let reversed = DateRange::new(day(2021, 1, 5), day(2021, 1, 1));
        assert_eq!(reversed.len_days(), 0);
    }

    #[test]
    fn vaccination_defaults_to_integer_output() {
        assert!(SeriesConfig::for_metric(Metric::Vaccination).integer_output);
        assert!(!SeriesConfig::for_metric(Metric::Sentiment).integer_output);
        assert_eq!(SeriesConfig::default().max_radius(), 3);
    }
}
