//! # Loader Module for tsplot
//!
//! Reads a timestamped CSV measurement log and aligns it to an elapsed-time axis.
//!
//! ## Input Layout
//!
//! ```text
//! time,channel_size,last_executed,forwardings, forwarding_latencies
//! 1700000000,0,12,3,5000000
//! 1700000001,1,15,4,7000000
//! ```
//!
//! - The first column is always the Unix timestamp in seconds, whatever its
//!   header says. Fractional seconds are kept to nanosecond precision.
//! - Header names are trimmed, so `" forwarding_latencies"` is found as
//!   `"forwarding_latencies"`.
//! - Empty cells in the requested column load as `NaN` and are ignored by the
//!   resampler.

mod error;


use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::series::{Sample, TimeSeries};

pub use error::LoaderError;

/// One decoded cell of a log row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Parsed as a floating-point number
    Number(f64),
    /// Non-numeric text
    Text(String),
    /// Empty or missing cell
    Empty,
}

impl CellValue {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return CellValue::Empty;
        }
        match raw.parse::<f64>() {
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::Text(raw.to_string()),
        }
    }
}

/// One input record: its absolute time point and the remaining named cells.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Absolute time of the row
    pub timestamp: DateTime<Utc>,
    /// Line number in the source, for error reporting
    pub line: u64,
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    /// Look up a cell by trimmed column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

/// Parse a Unix timestamp in (possibly fractional) seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let mut whole = seconds.floor();
    let mut nanos = ((seconds - whole) * 1e9).round();
    if nanos >= 1e9 {
        whole += 1.0;
        nanos = 0.0;
    }
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos as u32)
}

/// Seconds between two time points, with nanosecond resolution.
fn seconds_between(origin: DateTime<Utc>, t: DateTime<Utc>) -> f64 {
    let delta = t - origin;
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        // Beyond ~292 years the nanosecond count overflows
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// Reads measurement logs into [`TimeSeries`].
#[derive(Debug, Clone)]
pub struct TimeSeriesLoader {
    delimiter: u8,
}

impl Default for TimeSeriesLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl TimeSeriesLoader {
    /// Create a loader for comma-separated logs
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field delimiter (e.g. `b'\t'`)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load `column` from the log file at `path`
    pub fn load_file<P: AsRef<Path>>(
        &self,
        path: P,
        column: &str,
    ) -> Result<TimeSeries, LoaderError> {
        let file = File::open(path.as_ref())?;
        self.load(BufReader::new(file), column)
    }

    /// Load `column` from any reader holding a log with a header row.
    ///
    /// A log with only a header yields an empty series.
    pub fn load<R: Read>(&self, reader: R, column: &str) -> Result<TimeSeries, LoaderError> {
        let column = column.trim();
        let rows = self.read_rows(reader, Some(column))?;

        let origin = match rows.first() {
            Some(row) => row.timestamp,
            None => {
                debug!("Log for '{}' has no data rows", column);
                return Ok(TimeSeries::new(column, Vec::new()));
            }
        };

        let mut samples = Vec::with_capacity(rows.len());
        let mut empty_cells = 0usize;
        for row in &rows {
            let value = match row.get(column) {
                Some(CellValue::Number(v)) => *v,
                Some(CellValue::Empty) | None => {
                    empty_cells += 1;
                    f64::NAN
                }
                Some(CellValue::Text(text)) => {
                    return Err(LoaderError::MalformedValue {
                        line: row.line,
                        column: column.to_string(),
                        value: text.clone(),
                    })
                }
            };
            samples.push(Sample::new(seconds_between(origin, row.timestamp), value));
        }

        let series = TimeSeries::new(column, samples);
        if !series.is_time_ordered() {
            warn!(
                "Rows of '{}' are not in time order; elapsed times relative to the first row may be negative",
                column
            );
        }
        debug!(
            "Loaded {} samples of '{}' spanning {:.3}s ({} empty cells)",
            series.len(),
            column,
            series.duration_seconds(),
            empty_cells
        );
        Ok(series)
    }

    /// Decode all rows of a log.
    ///
    /// When `required` is given, its presence in the header is checked before
    /// any row is read.
    pub fn read_rows<R: Read>(
        &self,
        reader: R,
        required: Option<&str>,
    ) -> Result<Vec<RawRow>, LoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() {
            return Err(LoaderError::MissingTimestampColumn);
        }

        if let Some(column) = required {
            match headers.iter().filter(|h| h.as_str() == column).count() {
                0 => {
                    return Err(LoaderError::ColumnNotFound {
                        column: column.to_string(),
                        available: headers,
                    })
                }
                1 => {}
                count => {
                    return Err(LoaderError::AmbiguousColumn {
                        column: column.to_string(),
                        count,
                    })
                }
            }
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let raw_time = record.get(0).unwrap_or("");
            let timestamp =
                parse_timestamp(raw_time).ok_or_else(|| LoaderError::MalformedTimestamp {
                    line,
                    value: raw_time.to_string(),
                })?;

            // Repeated header names resolve to their first column
            let mut cells = HashMap::with_capacity(headers.len());
            for (i, name) in headers.iter().enumerate() {
                cells.entry(name.clone()).or_insert_with(|| {
                    record.get(i).map(CellValue::parse).unwrap_or(CellValue::Empty)
                });
            }

            rows.push(RawRow {
                timestamp,
                line,
                cells,
            });
        }

        Ok(rows)
    }
}
