//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline and engine code stay clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::domain::{AnalysisConfig, HoldoutModel, RegionCorrelation, SeriesConfig, SkippedRegion};
use crate::io::ingest::IngestedData;
use crate::report::NotableRegions;

/// Format the full run summary (inputs, engine settings, national results).
pub fn format_run_summary(run: &RunOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str("=== dm - Daily Sentiment vs. Vaccination ===\n");
    out.push_str(&format!(
        "Range: {} .. {} ({} days)\n",
        config.range.start,
        config.range.end,
        config.range.len_days()
    ));
    out.push_str(&format_ingest("Sentiment", &run.sentiment));
    out.push_str(&format_ingest("Vaccination", &run.vaccination));
    out.push_str(&format!(
        "Engine: sentiment {} | vaccination {}\n",
        fmt_engine(&config.sentiment),
        fmt_engine(&config.vaccination)
    ));

    out.push_str(&format!(
        "\nNational correlation: {}\n",
        fmt_corr(run.national_correlation)
    ));

    out.push_str("\nHold-out model (vaccination ~ sentiment):\n");
    match &run.holdout {
        Some(model) => out.push_str(&format_holdout(model)),
        None => out.push_str("- not available (too few days or constant sentiment)\n"),
    }
    out.push('\n');

    out
}

fn format_ingest(label: &str, data: &IngestedData) -> String {
    format!(
        "{:<12} rows={} used={} rejected={}\n",
        format!("{label}:"),
        data.rows_read,
        data.rows_used,
        data.row_errors.len()
    )
}

fn format_holdout(model: &HoldoutModel) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "- fit on first {} day(s), held out {}\n",
        model.n_fit, model.n_holdout
    ));
    out.push_str(&format!(
        "- slope={:.3} intercept={:.3}\n",
        model.line.slope, model.line.intercept
    ));
    let holdout = model
        .rmse_holdout
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "n/a".to_string());
    out.push_str(&format!("- RMSE fit={:.3} hold-out={holdout}\n", model.rmse_fit));
    out
}

/// Format the ranked region table plus any skipped regions.
pub fn format_correlations(correlations: &[RegionCorrelation], skipped: &[SkippedRegion]) -> String {
    let mut out = String::new();

    out.push_str("Region correlations (sentiment vs. vaccination):\n");
    out.push_str(&format_table(correlations, true));

    if !skipped.is_empty() {
        out.push_str(&format!("\nSkipped {} region(s):\n", skipped.len()));
        for s in skipped {
            out.push_str(&format!("  {:<4} {}\n", s.code, s.reason));
        }
    }

    out
}

/// Format the most / least correlated regions.
pub fn format_notable(notable: &NotableRegions) -> String {
    let mut out = String::new();

    out.push_str("Most correlated:\n");
    out.push_str(&format_table(&notable.most, false));
    out.push('\n');

    out.push_str("Least correlated:\n");
    out.push_str(&format_table(&notable.least, false));

    out
}

fn format_table(rows: &[RegionCorrelation], ranked: bool) -> String {
    let mut out = String::new();
    let rank_header = if ranked { format!("{:>4} ", "#") } else { String::new() };
    out.push_str(
        format!(
            "{rank_header}{:<4} {:<20} {:>8} {:>8} {:>8}",
            "code", "name", "r", "n_sent", "n_vacc"
        )
        .trim_end(),
    );
    out.push('\n');

    let rank_rule = if ranked { format!("{:-<4} ", "") } else { String::new() };
    out.push_str(&format!(
        "{rank_rule}{:-<4} {:-<20} {:-<8} {:-<8} {:-<8}\n",
        "", "", "", "", ""
    ));

    for (idx, r) in rows.iter().enumerate() {
        let rank = if ranked { format!("{:>4} ", idx + 1) } else { String::new() };
        out.push_str(
            format!(
                "{rank}{:<4} {:<20} {:>8.4} {:>8} {:>8}",
                r.code,
                truncate(&r.name, 20),
                r.correlation,
                r.sentiment_samples,
                r.vaccination_samples
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_engine(cfg: &SeriesConfig) -> String {
    let rounding = if cfg.integer_output { " (integer)" } else { "" };
    format!(
        "radius={}/{}{rounding}",
        cfg.interpolation_radius, cfg.extrapolation_radius
    )
}

fn fmt_corr(r: Option<f64>) -> String {
    match r {
        Some(r) => format!("r={r:.4}"),
        None => "undefined (constant series)".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::*;
    use crate::app::pipeline::RegionSeries;
    use crate::domain::{DateRange, LineFit, Metric};

    fn corr(code: &str, name: &str, correlation: f64) -> RegionCorrelation {
        RegionCorrelation {
            code: code.to_string(),
            name: name.to_string(),
            correlation,
            sentiment_samples: 12,
            vaccination_samples: 30,
        }
    }

    fn ingest(metric: Metric) -> IngestedData {
        IngestedData {
            metric,
            observations: Vec::new(),
            row_errors: Vec::new(),
            rows_read: 5,
            rows_used: 4,
        }
    }

    #[test]
    fn correlation_table_is_ranked() {
        let rows = vec![corr("NY", "New York", 0.5), corr("CA", "California", -0.25)];
        let skipped = vec![SkippedRegion {
            code: "TX".to_string(),
            reason: "too few samples".to_string(),
        }];
        let txt = format_correlations(&rows, &skipped);

        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[1], "   # code name                        r   n_sent   n_vacc");
        assert_eq!(lines[3], "   1 NY   New York               0.5000       12       30");
        assert_eq!(lines[4], "   2 CA   California            -0.2500       12       30");
        assert!(txt.contains("Skipped 1 region(s):\n  TX   too few samples\n"));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("District of Columbia", 20), "District of Columbia");
        assert_eq!(truncate("District of Columbia!", 20), "District of Columbi.");
    }

    #[test]
    fn run_summary_mentions_holdout() {
        let day = |d| NaiveDate::from_ymd_opt(2021, 3, d).unwrap();
        let config = AnalysisConfig {
            sentiment_path: PathBuf::from("s.csv"),
            vaccination_path: PathBuf::from("v.csv"),
            sentiment_column: "polarity".to_string(),
            vaccination_column: "daily_vaccinations".to_string(),
            range: DateRange::new(day(1), day(4)),
            sentiment: SeriesConfig::for_metric(Metric::Sentiment),
            vaccination: SeriesConfig::for_metric(Metric::Vaccination),
            notable: 3,
            plot: false,
            plot_width: 60,
            plot_height: 20,
            export_daily: None,
            export_json: None,
        };
        let run = RunOutput {
            sentiment: ingest(Metric::Sentiment),
            vaccination: ingest(Metric::Vaccination),
            national: RegionSeries {
                region: "US".to_string(),
                sentiment: vec![0.0; 4],
                vaccination: vec![0.0; 4],
            },
            national_correlation: Some(0.8),
            holdout: Some(HoldoutModel {
                line: LineFit {
                    slope: 2.0,
                    intercept: 1.0,
                },
                n_fit: 2,
                n_holdout: 2,
                rmse_fit: 0.0,
                rmse_holdout: Some(0.5),
            }),
            correlations: Vec::new(),
            skipped: Vec::new(),
        };

        let txt = format_run_summary(&run, &config);
        assert!(txt.contains("Range: 2021-03-01 .. 2021-03-04 (4 days)\n"));
        assert!(txt.contains("Sentiment:   rows=5 used=4 rejected=0\n"));
        assert!(txt.contains("vaccination radius=3/3 (integer)"));
        assert!(txt.contains("National correlation: r=0.8000\n"));
        assert!(txt.contains("- slope=2.000 intercept=1.000\n"));
        assert!(txt.contains("- RMSE fit=0.000 hold-out=0.500\n"));
    }
}
