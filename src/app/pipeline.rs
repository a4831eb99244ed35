//! Shared analysis pipeline used by every CLI subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> per-date averaging -> gap filling -> correlation -> hold-out model
//!
//! The CLI front-end then only decides what to print or export.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::domain::{
    AnalysisConfig, DateRange, HoldoutModel, Metric, Observation, Region, RegionCorrelation,
    SeriesConfig, SkippedRegion,
};
use crate::error::{AppError, SeriesError};
use crate::io::ingest::{IngestedData, load_observations};
use crate::math::{fit_line, pearson, rmse};
use crate::series::{MetricSeries, average_by_date, generate, group_by_region};

/// Label used for the pooled, all-regions series.
pub const NATIONAL: &str = "US";

/// Both filled daily series of one region over the analysis range.
#[derive(Debug, Clone)]
pub struct RegionSeries {
    pub region: String,
    pub sentiment: Vec<f64>,
    pub vaccination: Vec<f64>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub sentiment: IngestedData,
    pub vaccination: IngestedData,
    /// All regions pooled.
    pub national: RegionSeries,
    pub national_correlation: Option<f64>,
    pub holdout: Option<HoldoutModel>,
    /// Sorted by correlation, most positive first.
    pub correlations: Vec<RegionCorrelation>,
    pub skipped: Vec<SkippedRegion>,
}

/// Load both CSVs and run the full analysis.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let sentiment = load_observations(
        config.path(Metric::Sentiment),
        Metric::Sentiment,
        config.column(Metric::Sentiment),
    )?;
    let vaccination = load_observations(
        config.path(Metric::Vaccination),
        Metric::Vaccination,
        config.column(Metric::Vaccination),
    )?;
    analyze(config, sentiment, vaccination)
}

/// Run the analysis on already-ingested data.
pub fn analyze(
    config: &AnalysisConfig,
    sentiment: IngestedData,
    vaccination: IngestedData,
) -> Result<RunOutput, AppError> {
    let range = config.range;
    if range.start > range.end {
        return Err(SeriesError::InvalidRange {
            start: range.start,
            end: range.end,
        }
        .into());
    }

    let national = national_series(
        &sentiment.observations,
        &vaccination.observations,
        &range,
        config.sentiment,
        config.vaccination,
    )?;
    let national_correlation = pearson(&national.sentiment, &national.vaccination);
    let holdout = holdout_model(&range, &national.sentiment, &national.vaccination);

    let (correlations, skipped) = region_correlations(
        &sentiment.observations,
        &vaccination.observations,
        &range,
        config.sentiment,
        config.vaccination,
    );
    log::info!(
        "correlated {} region(s), skipped {}",
        correlations.len(),
        skipped.len()
    );

    Ok(RunOutput {
        sentiment,
        vaccination,
        national,
        national_correlation,
        holdout,
        correlations,
        skipped,
    })
}

/// Average same-day observations and build a gap-filling series.
pub fn build_series<'a, I>(observations: I, config: SeriesConfig) -> Result<MetricSeries, SeriesError>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let samples = generate(observations, |obs| (obs.date, obs.value));
    MetricSeries::new(average_by_date(samples), config)
}

/// Filled series of a single region; other regions' observations are ignored.
pub fn region_series(
    code: &str,
    sentiment: &[Observation],
    vaccination: &[Observation],
    range: &DateRange,
    sentiment_config: SeriesConfig,
    vaccination_config: SeriesConfig,
) -> Result<RegionSeries, SeriesError> {
    fill_pair(
        code,
        sentiment.iter().filter(|obs| obs.region == code),
        vaccination.iter().filter(|obs| obs.region == code),
        range,
        sentiment_config,
        vaccination_config,
    )
}

/// Filled series with every region pooled into one per-day average.
pub fn national_series(
    sentiment: &[Observation],
    vaccination: &[Observation],
    range: &DateRange,
    sentiment_config: SeriesConfig,
    vaccination_config: SeriesConfig,
) -> Result<RegionSeries, SeriesError> {
    fill_pair(NATIONAL, sentiment, vaccination, range, sentiment_config, vaccination_config)
}

fn fill_pair<'a, S, V>(
    region: &str,
    sentiment: S,
    vaccination: V,
    range: &DateRange,
    sentiment_config: SeriesConfig,
    vaccination_config: SeriesConfig,
) -> Result<RegionSeries, SeriesError>
where
    S: IntoIterator<Item = &'a Observation>,
    V: IntoIterator<Item = &'a Observation>,
{
    let sentiment = build_series(sentiment, sentiment_config)?.values(range.start, range.end)?;
    let vaccination = build_series(vaccination, vaccination_config)?.values(range.start, range.end)?;
    Ok(RegionSeries {
        region: region.to_string(),
        sentiment,
        vaccination,
    })
}

/// Correlate the filled series of every region present in both inputs.
///
/// Regions are processed in parallel; each builds its own series from the
/// shared, read-only observations.
pub fn region_correlations(
    sentiment: &[Observation],
    vaccination: &[Observation],
    range: &DateRange,
    sentiment_config: SeriesConfig,
    vaccination_config: SeriesConfig,
) -> (Vec<RegionCorrelation>, Vec<SkippedRegion>) {
    let sentiment_groups = group_by_region(sentiment, |obs| obs.region);
    let vaccination_groups = group_by_region(vaccination, |obs| obs.region);

    let shared: Vec<(&str, &Vec<&Observation>, &Vec<&Observation>)> = sentiment_groups
        .iter()
        .filter_map(|(code, s)| vaccination_groups.get(code).map(|v| (*code, s, v)))
        .collect();
    log_unmatched(&sentiment_groups, &vaccination_groups);

    let results: Vec<Result<RegionCorrelation, SkippedRegion>> = shared
        .par_iter()
        .map(|&(code, s, v)| -> Result<RegionCorrelation, SkippedRegion> {
            let skip = |reason: String| SkippedRegion {
                code: code.to_string(),
                reason,
            };
            let pair = fill_pair(
                code,
                s.iter().copied(),
                v.iter().copied(),
                range,
                sentiment_config,
                vaccination_config,
            )
            .map_err(|e| skip(e.to_string()))?;
            let correlation = pearson(&pair.sentiment, &pair.vaccination)
                .ok_or_else(|| skip("correlation undefined (constant series)".to_string()))?;
            Ok(RegionCorrelation {
                code: code.to_string(),
                name: Region::from_code(code).map(|r| r.name).unwrap_or(code).to_string(),
                correlation,
                sentiment_samples: s.len(),
                vaccination_samples: v.len(),
            })
        })
        .collect();

    let mut correlations = Vec::new();
    let mut skipped = Vec::new();
    for result in results {
        match result {
            Ok(c) => correlations.push(c),
            Err(s) => {
                log::warn!("skipping region {}: {}", s.code, s.reason);
                skipped.push(s);
            }
        }
    }
    correlations.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));

    (correlations, skipped)
}

fn log_unmatched<T>(sentiment: &BTreeMap<&str, T>, vaccination: &BTreeMap<&str, T>) {
    for code in sentiment.keys().filter(|c| !vaccination.contains_key(*c)) {
        log::debug!("region {code} has sentiment data only");
    }
    for code in vaccination.keys().filter(|c| !sentiment.contains_key(*c)) {
        log::debug!("region {code} has vaccination data only");
    }
}

/// Fit vaccination ~ sentiment on the first half of `range`, score on the rest.
///
/// Returns `None` if the series lengths disagree with the range or the first
/// half cannot support a line (fewer than two days, constant sentiment).
pub fn holdout_model(range: &DateRange, sentiment: &[f64], vaccination: &[f64]) -> Option<HoldoutModel> {
    let days = range.len_days();
    if sentiment.len() != days || vaccination.len() != days {
        return None;
    }
    let n_fit = usize::try_from((range.midpoint() - range.start).num_days() + 1).ok()?;
    let (fit_x, test_x) = sentiment.split_at(n_fit);
    let (fit_y, test_y) = vaccination.split_at(n_fit);

    let line = fit_line(fit_x, fit_y)?;
    Some(HoldoutModel {
        line,
        n_fit,
        n_holdout: test_x.len(),
        rmse_fit: rmse(&line, fit_x, fit_y)?,
        rmse_holdout: rmse(&line, test_x, test_y),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn obs(region: &'static str, offset: i64, value: f64) -> Observation {
        Observation {
            date: day(offset),
            region,
            value,
        }
    }

    fn cfg(integer_output: bool) -> SeriesConfig {
        SeriesConfig {
            interpolation_radius: 1,
            extrapolation_radius: 1,
            integer_output,
        }
    }

    #[test]
    fn build_series_averages_same_day_observations() {
        let rows = vec![obs("NY", 0, 1.0), obs("CA", 0, 3.0), obs("NY", 2, 6.0)];
        let series = build_series(&rows, cfg(false)).unwrap();
        assert_eq!(series.samples().len(), 2);
        assert_eq!(series.values(day(0), day(2)).unwrap(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn region_and_national_series_pool_differently() {
        let sentiment = vec![obs("NY", 0, 0.0), obs("NY", 2, 2.0), obs("CA", 0, 4.0), obs("CA", 2, 6.0)];
        let vaccination = vec![obs("NY", 0, 10.0), obs("NY", 2, 30.0), obs("CA", 1, 50.0), obs("CA", 2, 70.0)];
        let range = DateRange::new(day(0), day(2));

        let ny = region_series("NY", &sentiment, &vaccination, &range, cfg(false), cfg(true)).unwrap();
        assert_eq!(ny.region, "NY");
        assert_eq!(ny.sentiment, vec![0.0, 1.0, 2.0]);
        assert_eq!(ny.vaccination, vec![10.0, 20.0, 30.0]);

        let all = national_series(&sentiment, &vaccination, &range, cfg(false), cfg(true)).unwrap();
        assert_eq!(all.region, NATIONAL);
        assert_eq!(all.sentiment, vec![2.0, 3.0, 4.0]);
        assert_eq!(all.vaccination, vec![10.0, 50.0, 50.0]);

        let err = region_series("TX", &sentiment, &vaccination, &range, cfg(false), cfg(true)).unwrap_err();
        assert!(matches!(err, SeriesError::ConstructionInvariantViolation(_)));
    }

    #[test]
    fn region_correlations_rank_and_skip() {
        let sentiment = vec![
            obs("NY", 0, 0.0),
            obs("NY", 4, 1.0),
            obs("CA", 0, 1.0),
            obs("CA", 4, 0.0),
            obs("TX", 0, 0.5),
            obs("WA", 0, 0.1),
            obs("WA", 1, 0.2),
        ];
        let vaccination = vec![
            obs("NY", 0, 10.0),
            obs("NY", 4, 50.0),
            obs("CA", 0, 10.0),
            obs("CA", 4, 50.0),
            obs("TX", 0, 1.0),
            obs("TX", 3, 2.0),
        ];
        let range = DateRange::new(day(0), day(4));
        let (correlations, skipped) =
            region_correlations(&sentiment, &vaccination, &range, cfg(false), cfg(true));

        let codes: Vec<&str> = correlations.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["NY", "CA"]);
        assert!((correlations[0].correlation - 1.0).abs() < 1e-9);
        assert!((correlations[1].correlation + 1.0).abs() < 1e-9);
        assert_eq!(correlations[0].name, "New York");

        // TX has a single sentiment sample; WA has no vaccination data at all.
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].code, "TX");
    }

    #[test]
    fn holdout_model_splits_at_midpoint() {
        let range = DateRange::new(day(0), day(5));
        let sentiment = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let vaccination = [1.0, 3.0, 5.0, 7.0, 9.0, 12.0];
        let model = holdout_model(&range, &sentiment, &vaccination).unwrap();

        assert_eq!(model.n_fit, 3);
        assert_eq!(model.n_holdout, 3);
        assert!((model.line.slope - 2.0).abs() < 1e-12);
        assert!((model.line.intercept - 1.0).abs() < 1e-12);
        assert!(model.rmse_fit.abs() < 1e-12);
        let expected = (1.0_f64 / 3.0).sqrt();
        assert!((model.rmse_holdout.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn holdout_model_needs_matching_lengths() {
        let range = DateRange::new(day(0), day(3));
        assert!(holdout_model(&range, &[1.0, 2.0], &[1.0, 2.0]).is_none());
    }
}
