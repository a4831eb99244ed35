//! Export filled daily series (CSV) and correlation tables (JSON).
//!
//! Both formats are meant to be easy to consume in spreadsheets or downstream
//! plotting scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{CorrelationFile, DateRange, Metric};
use crate::error::AppError;

/// Write `date,sentiment,vaccination` rows, one per day of `range`.
pub fn write_daily_csv(
    path: &Path,
    range: &DateRange,
    sentiment: &[f64],
    vaccination: &[f64],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_daily(BufWriter::new(file), range, sentiment, vaccination)
}

fn write_daily<W: Write>(
    mut out: W,
    range: &DateRange,
    sentiment: &[f64],
    vaccination: &[f64],
) -> Result<(), AppError> {
    let days = range.len_days();
    if sentiment.len() != days || vaccination.len() != days {
        return Err(AppError::new(
            4,
            format!(
                "Series length mismatch: {days} days, {} sentiment, {} vaccination values.",
                sentiment.len(),
                vaccination.len()
            ),
        ));
    }

    writeln!(out, "date,sentiment,vaccination")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (day, (s, v)) in range.start.iter_days().zip(sentiment.iter().zip(vaccination)) {
        writeln!(out, "{day},{s:.6},{v}")
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write one filled series as `date,<metric>` rows starting at `start`.
pub fn write_series<W: Write>(mut out: W, start: NaiveDate, metric: Metric, values: &[f64]) -> Result<(), AppError> {
    writeln!(out, "date,{}", metric.display_name())
        .map_err(|e| AppError::new(2, format!("Failed to write series header: {e}")))?;
    for (day, v) in start.iter_days().zip(values) {
        writeln!(out, "{day},{v}").map_err(|e| AppError::new(2, format!("Failed to write series row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush series output: {e}")))?;
    Ok(())
}

/// Write the correlation table as pretty JSON.
pub fn write_correlations_json(path: &Path, table: &CorrelationFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON '{}': {e}", path.display())))?;
    write_correlations(BufWriter::new(file), table)
}

fn write_correlations<W: Write>(mut out: W, table: &CorrelationFile) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut out, table)
        .map_err(|e| AppError::new(2, format!("Failed to write correlation JSON: {e}")))?;
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush correlation JSON: {e}")))?;
    Ok(())
}

/// Read a correlation JSON file written by [`write_correlations_json`].
pub fn read_correlations_json(path: &Path) -> Result<CorrelationFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid correlation JSON: {e}")))
}
