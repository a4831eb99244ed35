//! Command-line parsing for the daily sentiment / vaccination analyser.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the engine and statistics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::Metric;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "dm",
    version,
    about = "Gap-filled daily sentiment vs. vaccination analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill both series, correlate them nationally and per region, and print a report.
    Report(AnalysisArgs),
    /// Print the per-region correlation table only (useful for scripting).
    Correlate(AnalysisArgs),
    /// Print one gap-filled daily series as `date,value` CSV.
    Series(SeriesArgs),
}

/// Common options for the report and correlate commands.
#[derive(Debug, Parser, Clone)]
pub struct AnalysisArgs {
    /// Sentiment CSV (date, region, score per row).
    #[arg(long, env = "DM_SENTIMENT_CSV", value_name = "CSV")]
    pub sentiment: PathBuf,

    /// Vaccination CSV (date, region, count per row).
    #[arg(long, env = "DM_VACCINATION_CSV", value_name = "CSV")]
    pub vaccination: PathBuf,

    /// Value column in the sentiment CSV.
    #[arg(long, default_value = "polarity")]
    pub sentiment_column: String,

    /// Value column in the vaccination CSV.
    #[arg(long, default_value = "daily_vaccinations")]
    pub vaccination_column: String,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Regions listed at each end of the "notable regions" section.
    #[arg(long, default_value_t = 3)]
    pub notable: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Export the national daily series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the correlation table to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Date range and engine settings shared by every command.
#[derive(Debug, Parser, Clone)]
pub struct EngineArgs {
    /// First day of the analysis range (YYYY-MM-DD).
    #[arg(long, default_value = "2021-02-28")]
    pub start: NaiveDate,

    /// Last day of the analysis range, inclusive (YYYY-MM-DD).
    #[arg(long, default_value = "2021-11-01")]
    pub end: NaiveDate,

    /// TOML engine config (per-metric radii and rounding).
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Override the interpolation radius for every metric.
    #[arg(long)]
    pub interpolation_radius: Option<usize>,

    /// Override the extrapolation radius for every metric.
    #[arg(long)]
    pub extrapolation_radius: Option<usize>,
}

/// Options for printing a single filled series.
#[derive(Debug, Parser)]
pub struct SeriesArgs {
    /// Which metric the input CSV holds.
    #[arg(long, value_enum)]
    pub metric: Metric,

    /// Input CSV.
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,

    /// Value column (defaults to the metric's usual column).
    #[arg(long)]
    pub column: Option<String>,

    /// Restrict to one region (code or name); all regions are pooled otherwise.
    #[arg(long)]
    pub region: Option<String>,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Write to a file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}
