//! # Series Data Model
//!
//! Plain value types passed between the pipeline stages:
//!
//! - [`TimeSeries`]: `(elapsed_seconds, value)` samples produced by the loader
//! - [`ResampledSeries`]: one averaged point per populated window, produced by
//!   the resampler and consumed by the renderer
//!
//! Both are immutable once built; stages hand them on by reference.

use std::fmt;
use std::ops::Range;

/// A single measurement on the elapsed-time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the first row of the log
    pub elapsed_seconds: f64,
    /// Raw column value, `NaN` when the cell was empty
    pub value: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(elapsed_seconds: f64, value: f64) -> Self {
        Self {
            elapsed_seconds,
            value,
        }
    }

    /// Whether the sample carries a usable value
    pub fn has_value(&self) -> bool {
        !self.value.is_nan()
    }
}

/// Samples of one column, indexed by elapsed time.
///
/// The first sample always sits at exactly `0.0` seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    column: String,
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// Build a series from already-aligned samples
    pub fn new(column: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            column: column.into(),
            samples,
        }
    }

    /// Name of the column the values were read from
    pub fn column(&self) -> &str {
        &self.column
    }

    /// All samples in input order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true when the log had no data rows
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Elapsed seconds of every sample, in input order
    pub fn elapsed(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.elapsed_seconds).collect()
    }

    /// Whether the elapsed axis never goes backwards
    pub fn is_time_ordered(&self) -> bool {
        self.samples
            .windows(2)
            .all(|w| w[0].elapsed_seconds <= w[1].elapsed_seconds)
    }

    /// Elapsed time of the last sample (0.0 when empty)
    pub fn duration_seconds(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.elapsed_seconds)
            .fold(0.0, f64::max)
    }
}

/// One populated resampling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampledPoint {
    /// Window start in whole seconds
    pub window_start: i64,
    /// Arithmetic mean of the window's values
    pub mean: f64,
    /// Number of values that went into the mean
    pub count: usize,
}

/// Averaged windows in strictly increasing `window_start` order.
///
/// Windows without samples are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResampledSeries {
    column: String,
    window_seconds: u32,
    points: Vec<ResampledPoint>,
}

impl ResampledSeries {
    pub(crate) fn new(column: String, window_seconds: u32, points: Vec<ResampledPoint>) -> Self {
        debug_assert!(points
            .windows(2)
            .all(|w| w[0].window_start < w[1].window_start));
        Self {
            column,
            window_seconds,
            points,
        }
    }

    /// Name of the column the series was built from
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Width of each window in seconds
    pub fn window_seconds(&self) -> u32 {
        self.window_seconds
    }

    /// Populated windows in ascending order
    pub fn points(&self) -> &[ResampledPoint] {
        &self.points
    }

    /// Number of populated windows
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when no window holds a value
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Window starts, the x values of the chart
    pub fn window_starts(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.window_start).collect()
    }

    /// Window means, the unscaled y values of the chart
    pub fn means(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mean).collect()
    }

    /// Split the points into runs of adjacent windows.
    ///
    /// A missing window between two points ends one run and starts the next.
    pub fn contiguous_runs(&self) -> Vec<Range<usize>> {
        let step = i64::from(self.window_seconds.max(1));
        let mut runs = Vec::new();
        let mut start = 0;
        for i in 1..self.points.len() {
            if self.points[i].window_start - self.points[i - 1].window_start != step {
                runs.push(start..i);
                start = i;
            }
        }
        if start < self.points.len() {
            runs.push(start..self.points.len());
        }
        runs
    }

    /// Number of empty windows between the first and last populated one
    pub fn gap_count(&self) -> usize {
        let step = i64::from(self.window_seconds.max(1));
        self.points
            .windows(2)
            .map(|w| ((w[1].window_start - w[0].window_start) / step - 1) as usize)
            .sum()
    }
}

impl fmt::Display for ResampledSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} windows of {}s ({} gaps)",
            self.column,
            self.points.len(),
            self.window_seconds,
            self.gap_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(window_start: i64, mean: f64) -> ResampledPoint {
        ResampledPoint {
            window_start,
            mean,
            count: 1,
        }
    }

    #[test]
    fn test_time_ordered() {
        let ordered = TimeSeries::new(
            "x",
            vec![Sample::new(0.0, 1.0), Sample::new(0.5, 2.0), Sample::new(0.5, 3.0)],
        );
        assert!(ordered.is_time_ordered());
        assert_eq!(ordered.duration_seconds(), 0.5);

        let shuffled = TimeSeries::new("x", vec![Sample::new(0.0, 1.0), Sample::new(-1.0, 2.0)]);
        assert!(!shuffled.is_time_ordered());
    }

    #[test]
    fn test_contiguous_runs_split_on_gaps() {
        let series = ResampledSeries::new(
            "x".to_string(),
            1,
            vec![point(0, 1.0), point(1, 2.0), point(4, 3.0), point(6, 4.0), point(7, 5.0)],
        );

        let runs = series.contiguous_runs();
        assert_eq!(runs, vec![0..2, 2..3, 3..5]);
        assert_eq!(series.gap_count(), 3);
    }

    #[test]
    fn test_runs_respect_window_width() {
        let series = ResampledSeries::new(
            "x".to_string(),
            5,
            vec![point(0, 1.0), point(5, 2.0), point(15, 3.0)],
        );
        assert_eq!(series.contiguous_runs().len(), 2);
        assert_eq!(series.gap_count(), 1);
    }

    #[test]
    fn test_empty_series() {
        let series = ResampledSeries::default();
        assert!(series.contiguous_runs().is_empty());
        assert_eq!(series.gap_count(), 0);
    }
}
