use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use daily_metrics::app::{correlation_file, pipeline};
use daily_metrics::config::EngineConfig;
use daily_metrics::domain::{AnalysisConfig, DateRange, Metric};
use daily_metrics::io::export::{read_correlations_json, write_correlations_json, write_daily_csv};

const SENTIMENT_CSV: &str = "\
date,state,polarity
2021-03-01 08:15,NY,0.0
2021-03-05 12:00,New York,0.4
2021-03-09 23:59,NY,0.8
2021-03-01,CA,0.8
2021-03-05,CA,0.4
2021-03-09,California,0.0
2021-03-01,TX,0.5
2021-03-02,Atlantis,0.9
";

const VACCINATION_CSV: &str = "\
date,location,daily_vaccinations
2021-03-01,New York,100
2021-03-03,New York,200
2021-03-09,New York,500
2021-03-01,California,100
2021-03-05,California,300
2021-03-09,California,500
2021-03-01,Texas,5
2021-03-02,Texas,6
";

const ENGINE_TOML: &str = "\
[sentiment]
interpolation_radius = 1
extrapolation_radius = 1

[vaccination]
interpolation_radius = 1
extrapolation_radius = 1
";

fn tmp_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
}

fn analysis_config(dir: &Path, sentiment: &str, vaccination: &str) -> AnalysisConfig {
    let sentiment_path = dir.join("sentiment.csv");
    let vaccination_path = dir.join("vaccination.csv");
    let config_path = dir.join("engine.toml");
    fs::write(&sentiment_path, sentiment).unwrap();
    fs::write(&vaccination_path, vaccination).unwrap();
    fs::write(&config_path, ENGINE_TOML).unwrap();

    let engine = EngineConfig::from_file(&config_path).unwrap();
    AnalysisConfig {
        sentiment_path,
        vaccination_path,
        sentiment_column: Metric::Sentiment.default_column().to_string(),
        vaccination_column: Metric::Vaccination.default_column().to_string(),
        range: DateRange::new(day(1), day(9)),
        sentiment: engine.sentiment,
        vaccination: engine.vaccination,
        notable: 3,
        plot: false,
        plot_width: 60,
        plot_height: 20,
        export_daily: None,
        export_json: None,
    }
}

#[test]
fn csv_to_ranked_correlations() {
    let dir = tmp_dir("pipeline_ranked");
    let config = analysis_config(&dir, SENTIMENT_CSV, VACCINATION_CSV);
    assert!(config.vaccination.integer_output);
    assert_eq!(config.sentiment.interpolation_radius, 1);

    let run = pipeline::run_analysis(&config).unwrap();

    assert_eq!(run.sentiment.rows_read, 8);
    assert_eq!(run.sentiment.rows_used, 7);
    assert_eq!(run.sentiment.row_errors.len(), 1);
    assert_eq!(run.vaccination.rows_used, 8);

    let codes: Vec<&str> = run.correlations.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["NY", "CA"]);
    assert!((run.correlations[0].correlation - 1.0).abs() < 1e-9);
    assert!((run.correlations[1].correlation + 1.0).abs() < 1e-9);
    assert_eq!(run.correlations[1].name, "California");
    assert_eq!(run.correlations[0].sentiment_samples, 3);

    assert_eq!(run.skipped.len(), 1);
    assert_eq!(run.skipped[0].code, "TX");

    assert_eq!(run.national.sentiment.len(), 9);
    assert_eq!(run.national.vaccination.len(), 9);
    assert!(run.national.vaccination.iter().all(|v| v.is_finite()));

    let holdout = run.holdout.as_ref().unwrap();
    assert_eq!(holdout.n_fit, 5);
    assert_eq!(holdout.n_holdout, 4);
}

#[test]
fn exports_round_trip_through_disk() {
    let dir = tmp_dir("pipeline_exports");
    let config = analysis_config(&dir, SENTIMENT_CSV, VACCINATION_CSV);
    let run = pipeline::run_analysis(&config).unwrap();

    let csv_path = dir.join("daily.csv");
    write_daily_csv(
        &csv_path,
        &config.range,
        &run.national.sentiment,
        &run.national.vaccination,
    )
    .unwrap();
    let text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "date,sentiment,vaccination");
    assert!(lines[1].starts_with("2021-03-01,"));
    assert!(lines[9].starts_with("2021-03-09,"));

    let json_path = dir.join("correlations.json");
    write_correlations_json(&json_path, &correlation_file(&run, &config)).unwrap();
    let table = read_correlations_json(&json_path).unwrap();
    assert!(table.tool.starts_with("dm "));
    assert_eq!(table.range, config.range);
    assert_eq!(table.regions.len(), 2);
    assert_eq!(table.regions[0].code, "NY");
    assert_eq!(table.skipped[0].code, "TX");
}

#[test]
fn empty_input_is_not_enough_data() {
    let dir = tmp_dir("pipeline_empty");
    let config = analysis_config(&dir, "date,state,polarity\n", VACCINATION_CSV);
    let err = pipeline::run_analysis(&config).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tmp_dir("pipeline_missing");
    let mut config = analysis_config(&dir, SENTIMENT_CSV, VACCINATION_CSV);
    config.vaccination_path = dir.join("does-not-exist.csv");
    let err = pipeline::run_analysis(&config).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
