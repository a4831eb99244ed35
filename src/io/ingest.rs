//! CSV ingest and normalization.
//!
//! This module turns a dated, per-region observation CSV (post sentiment
//! scores or vaccination counts) into clean `Observation`s for the engine.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no gap filling or statistics here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{Metric, Observation, Region};
use crate::error::AppError;

const DATE_COLUMNS: [&str; 3] = ["date", "time_stamp", "timestamp"];
const REGION_COLUMNS: [&str; 4] = ["region", "location", "state", "code"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized observations + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub metric: Metric,
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Resolved positions of the columns we read.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    region: usize,
    value: usize,
}

/// Load observations for `metric` from a CSV file.
pub fn load_observations(path: &Path, metric: Metric, value_column: &str) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    let data = read_observations(file, metric, value_column)?;
    log::info!(
        "{}: {} rows read, {} used, {} rejected",
        path.display(),
        data.rows_read,
        data.rows_used,
        data.row_errors.len()
    );
    Ok(data)
}

/// Read observations from any CSV source (header row required).
pub fn read_observations<R: Read>(source: R, metric: Metric, value_column: &str) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let columns = resolve_columns(&header_map, value_column)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, columns));
        match parsed {
            Ok(obs) => observations.push(obs),
            Err(message) => {
                log::debug!("line {line}: {message}");
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = observations.len();
    if rows_used == 0 {
        return Err(AppError::new(
            3,
            format!("No valid {} rows remain after validation.", metric.display_name()),
        ));
    }

    Ok(IngestedData {
        metric,
        observations,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>, value_column: &str) -> Result<Columns, AppError> {
    let find_any = |names: &[&str]| names.iter().find_map(|n| header_map.get(*n).copied());

    let date = find_any(&DATE_COLUMNS).ok_or_else(|| {
        AppError::new(2, format!("Missing required date column (one of: {}).", DATE_COLUMNS.join(", ")))
    })?;
    let region = find_any(&REGION_COLUMNS).ok_or_else(|| {
        AppError::new(2, format!("Missing required region column (one of: {}).", REGION_COLUMNS.join(", ")))
    })?;
    let value_key = normalize_header_name(value_column);
    let value = header_map
        .get(&value_key)
        .or_else(|| header_map.get("value"))
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required value column: `{value_column}`")))?;

    Ok(Columns { date, region, value })
}

fn parse_row(record: &StringRecord, columns: Columns) -> Result<Observation, String> {
    let date = parse_date(get_required(record, columns.date, "date")?)?;

    let raw_region = get_required(record, columns.region, "region")?;
    let region = Region::lookup(raw_region).ok_or_else(|| format!("Unknown region '{raw_region}'."))?;

    let raw_value = get_required(record, columns.value, "value")?;
    let value = raw_value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid value '{raw_value}'."))?;

    Ok(Observation {
        date,
        region: region.code,
        value,
    })
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

/// Parse a calendar date, discarding any time-of-day component.
///
/// Post timestamps arrive in several layouts, so we accept a small fixed set
/// of formats and stay deterministic.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d-%m-%Y %H:%M:%S",
    ];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected YYYY-MM-DD or DD-MM-YYYY, optionally followed by HH:MM[:SS]."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_accepts_dates_and_timestamps() {
        assert_eq!(parse_date("2021-03-01").unwrap(), day(2021, 3, 1));
        assert_eq!(parse_date("2021-03-01 14:05").unwrap(), day(2021, 3, 1));
        assert_eq!(parse_date("2021-03-01 14:05:59").unwrap(), day(2021, 3, 1));
        assert_eq!(parse_date("01-03-2021 23:59").unwrap(), day(2021, 3, 1));
        assert_eq!(parse_date("01/03/2021").unwrap(), day(2021, 3, 1));
        assert!(parse_date("March 1st").is_err());
    }

    #[test]
    fn reads_rows_and_reports_bad_ones() {
        let csv = "\u{feff}Date,Location,daily_vaccinations,total\n\
                   2021-03-01,NY,100,5\n\
                   2021-03-02,new york,,6\n\
                   2021-03-02,Atlantis,5,6\n\
                   bad-date,CA,1,1\n\
                   2021-03-03,\"Austin, TX\",42.5,7\n";
        let data = read_observations(csv.as_bytes(), Metric::Vaccination, "daily_vaccinations").unwrap();

        assert_eq!(data.rows_read, 5);
        assert_eq!(data.rows_used, 2);
        assert_eq!(data.observations[0].region, "NY");
        assert_eq!(data.observations[0].value, 100.0);
        assert_eq!(data.observations[1].region, "TX");
        assert_eq!(data.observations[1].date, day(2021, 3, 3));

        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(data.row_errors[1].message.contains("Atlantis"));
    }

    #[test]
    fn generic_value_column_is_a_fallback() {
        let csv = "date,state,value\n2021-03-01,CA,0.5\n";
        let data = read_observations(csv.as_bytes(), Metric::Sentiment, "polarity").unwrap();
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.observations[0].value, 0.5);
    }

    #[test]
    fn missing_columns_and_empty_input_fail() {
        let err = read_observations("when,state,value\n".as_bytes(), Metric::Sentiment, "value").unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = read_observations("date,state,value\n".as_bytes(), Metric::Sentiment, "value").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
