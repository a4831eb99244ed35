//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the engine config (TOML file + CLI overrides)
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::fs::File;
use std::io::{self, BufWriter};

use clap::Parser;

use crate::cli::{AnalysisArgs, Command, EngineArgs, SeriesArgs};
use crate::config::EngineConfig;
use crate::domain::{AnalysisConfig, CorrelationFile, DateRange, Region};
use crate::error::{AppError, SeriesError};
use crate::io::export::{write_correlations_json, write_daily_csv, write_series};
use crate::io::ingest::load_observations;

pub mod pipeline;

/// Entry point for the `dm` binary.
pub fn run() -> Result<(), AppError> {
    // `DM_SENTIMENT_CSV` / `DM_VACCINATION_CSV` may come from a local `.env`.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Report(args) => handle_analysis(args, OutputMode::Full),
        Command::Correlate(args) => handle_analysis(args, OutputMode::CorrelationsOnly),
        Command::Series(args) => handle_series(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    CorrelationsOnly,
}

fn handle_analysis(args: AnalysisArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args)?;
    let run = pipeline::run_analysis(&config)?;

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_run_summary(&run, &config));
    }

    println!(
        "{}",
        crate::report::format_correlations(&run.correlations, &run.skipped)
    );

    if mode == OutputMode::Full {
        let notable = crate::report::notable_regions(&run.correlations, config.notable);
        println!("{}", crate::report::format_notable(&notable));

        if config.plot {
            let plot = crate::plot::render_scatter(
                &run.national.sentiment,
                &run.national.vaccination,
                run.holdout.as_ref().map(|m| &m.line),
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_daily {
        write_daily_csv(
            path,
            &config.range,
            &run.national.sentiment,
            &run.national.vaccination,
        )?;
        log::info!("wrote daily series to {}", path.display());
    }
    if let Some(path) = &config.export_json {
        write_correlations_json(path, &correlation_file(&run, &config))?;
        log::info!("wrote correlations to {}", path.display());
    }

    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let engine = engine_config_from_args(&args.engine)?;
    let range = range_from_args(&args.engine)?;
    let column = args
        .column
        .as_deref()
        .unwrap_or_else(|| args.metric.default_column());
    let data = load_observations(&args.input, args.metric, column)?;

    let region = args
        .region
        .as_deref()
        .map(|raw| Region::lookup(raw).ok_or_else(|| AppError::new(2, format!("Unknown region '{raw}'."))))
        .transpose()?;
    let observations = data
        .observations
        .iter()
        .filter(|obs| region.is_none_or(|r| obs.region == r.code));

    let series = pipeline::build_series(observations, engine.series_config(args.metric))?;
    let values = series.values(range.start, range.end)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                AppError::new(2, format!("Failed to create output '{}': {e}", path.display()))
            })?;
            write_series(BufWriter::new(file), range.start, args.metric, &values)
        }
        None => write_series(io::stdout().lock(), range.start, args.metric, &values),
    }
}

/// Build the serializable correlation table for a finished run.
pub fn correlation_file(run: &pipeline::RunOutput, config: &AnalysisConfig) -> CorrelationFile {
    CorrelationFile {
        tool: format!("dm {}", env!("CARGO_PKG_VERSION")),
        range: config.range,
        national: run.national_correlation,
        regions: run.correlations.clone(),
        skipped: run.skipped.clone(),
    }
}

pub fn analysis_config_from_args(args: &AnalysisArgs) -> Result<AnalysisConfig, AppError> {
    let engine = engine_config_from_args(&args.engine)?;
    Ok(AnalysisConfig {
        sentiment_path: args.sentiment.clone(),
        vaccination_path: args.vaccination.clone(),
        sentiment_column: args.sentiment_column.clone(),
        vaccination_column: args.vaccination_column.clone(),
        range: range_from_args(&args.engine)?,
        sentiment: engine.sentiment,
        vaccination: engine.vaccination,
        notable: args.notable,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_daily: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

/// Config file (or defaults) with CLI radius overrides applied to both metrics.
pub fn engine_config_from_args(args: &EngineArgs) -> Result<EngineConfig, AppError> {
    let mut engine = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    for cfg in [&mut engine.sentiment, &mut engine.vaccination] {
        if let Some(radius) = args.interpolation_radius {
            cfg.interpolation_radius = radius;
        }
        if let Some(radius) = args.extrapolation_radius {
            cfg.extrapolation_radius = radius;
        }
    }
    engine.validate()?;
    Ok(engine)
}

fn range_from_args(args: &EngineArgs) -> Result<DateRange, AppError> {
    if args.start > args.end {
        return Err(SeriesError::InvalidRange {
            start: args.start,
            end: args.end,
        }
        .into());
    }
    Ok(DateRange::new(args.start, args.end))
}
