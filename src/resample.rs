//! # Resampler
//!
//! Buckets a [`TimeSeries`] into fixed windows anchored at elapsed time zero
//! and averages each bucket.
//!
//! Window `k` covers `[k * w, (k + 1) * w)` seconds. Windows that receive no
//! values are left out of the result, so a pause in measurement shows up as a
//! gap instead of a run of zeros.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use log::debug;

use crate::series::{ResampledPoint, ResampledSeries, TimeSeries};

/// Width of a resampling window in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowWidth(NonZeroU32);

impl WindowWidth {
    /// One-second windows
    pub const ONE_SECOND: WindowWidth = WindowWidth(NonZeroU32::MIN);

    /// Returns `None` for a zero width
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        NonZeroU32::new(seconds).map(WindowWidth)
    }

    /// Width in seconds
    pub fn seconds(&self) -> u32 {
        self.0.get()
    }

    /// Index of the window holding `elapsed_seconds`
    pub fn window_index(&self, elapsed_seconds: f64) -> i64 {
        (elapsed_seconds / f64::from(self.seconds())).floor() as i64
    }
}

impl Default for WindowWidth {
    fn default() -> Self {
        Self::ONE_SECOND
    }
}

impl fmt::Display for WindowWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

/// Averages samples per window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resampler {
    width: WindowWidth,
}

impl Resampler {
    /// Resampler with one-second windows
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different window width
    pub fn with_width(mut self, width: WindowWidth) -> Self {
        self.width = width;
        self
    }

    /// Configured window width
    pub fn width(&self) -> WindowWidth {
        self.width
    }

    /// Average `series` per window.
    ///
    /// Samples without a value are skipped. The result does not depend on the
    /// order of the input samples: each window's values are summed in sorted
    /// order.
    pub fn resample(&self, series: &TimeSeries) -> ResampledSeries {
        let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        let mut skipped = 0usize;

        for sample in series.samples() {
            if !sample.has_value() || !sample.elapsed_seconds.is_finite() {
                skipped += 1;
                continue;
            }
            buckets
                .entry(self.width.window_index(sample.elapsed_seconds))
                .or_default()
                .push(sample.value);
        }

        let step = i64::from(self.width.seconds());
        let points: Vec<ResampledPoint> = buckets
            .into_iter()
            .map(|(index, mut values)| {
                values.sort_by(f64::total_cmp);
                let count = values.len();
                let sum: f64 = values.iter().sum();
                ResampledPoint {
                    window_start: index * step,
                    mean: sum / count as f64,
                    count,
                }
            })
            .collect();

        debug!(
            "Resampled {} samples of '{}' into {} windows of {} ({} skipped)",
            series.len(),
            series.column(),
            points.len(),
            self.width,
            skipped
        );

        ResampledSeries::new(series.column().to_string(), self.width.seconds(), points)
    }
}

/// Average `series` into one-second windows.
pub fn resample(series: &TimeSeries) -> ResampledSeries {
    Resampler::new().resample(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Sample;
    use proptest::prelude::*;

    fn series(pairs: &[(f64, f64)]) -> TimeSeries {
        TimeSeries::new(
            "forwarding_latencies",
            pairs.iter().map(|&(t, v)| Sample::new(t, v)).collect(),
        )
    }

    #[test]
    fn test_latency_scenario() {
        let input = series(&[(0.0, 5_000_000.0), (0.4, 7_000_000.0), (1.2, 3_000_000.0)]);
        let out = resample(&input);

        assert_eq!(out.window_starts(), vec![0, 1]);
        assert_eq!(out.means(), vec![6_000_000.0, 3_000_000.0]);
        assert_eq!(out.points()[0].count, 2);
        assert_eq!(out.points()[1].count, 1);
        assert_eq!(out.column(), "forwarding_latencies");
    }

    #[test]
    fn test_empty_windows_are_absent() {
        let input = series(&[(0.1, 1.0), (3.9, 2.0), (4.0, 4.0)]);
        let out = resample(&input);

        assert_eq!(out.window_starts(), vec![0, 3, 4]);
        assert!(out.means().iter().all(|m| *m != 0.0));
        assert_eq!(out.gap_count(), 2);
    }

    #[test]
    fn test_window_boundaries() {
        // [k, k+1): 1.0 belongs to window 1, 0.999 to window 0
        let input = series(&[(0.0, 1.0), (0.999, 3.0), (1.0, 10.0)]);
        let out = resample(&input);
        assert_eq!(out.means(), vec![2.0, 10.0]);
    }

    #[test]
    fn test_missing_values_skipped() {
        let input = series(&[(0.0, f64::NAN), (0.5, 4.0), (1.5, f64::NAN)]);
        let out = resample(&input);
        assert_eq!(out.window_starts(), vec![0]);
        assert_eq!(out.means(), vec![4.0]);
        assert_eq!(out.points()[0].count, 1);
    }

    #[test]
    fn test_negative_elapsed_times() {
        let input = series(&[(0.0, 1.0), (-0.5, 3.0), (-1.0, 5.0)]);
        let out = resample(&input);
        assert_eq!(out.window_starts(), vec![-1, 0]);
        assert_eq!(out.means(), vec![4.0, 1.0]);
    }

    #[test]
    fn test_wider_windows() {
        let width = WindowWidth::from_seconds(5).unwrap();
        let input = series(&[(0.0, 1.0), (4.9, 3.0), (5.0, 6.0), (12.0, 8.0)]);
        let out = Resampler::new().with_width(width).resample(&input);

        assert_eq!(out.window_starts(), vec![0, 5, 10]);
        assert_eq!(out.means(), vec![2.0, 6.0, 8.0]);
        assert_eq!(out.window_seconds(), 5);
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(WindowWidth::from_seconds(0).is_none());
        assert_eq!(WindowWidth::default().seconds(), 1);
        assert_eq!(WindowWidth::default().to_string(), "1s");
    }

    #[test]
    fn test_empty_series() {
        let out = resample(&TimeSeries::default());
        assert!(out.is_empty());
    }

    proptest! {
        /// Permuting the samples never changes the result
        #[test]
        fn test_order_independent(
            pairs in prop::collection::vec((0.0f64..30.0, -1e9f64..1e9), 0..64),
            seed in any::<u64>(),
        ) {
            let forward = series(&pairs);

            let mut shuffled = pairs.clone();
            // Deterministic Fisher-Yates driven by the seed
            let mut state = seed | 1;
            for i in (1..shuffled.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let j = (state % (i as u64 + 1)) as usize;
                shuffled.swap(i, j);
            }

            prop_assert_eq!(resample(&forward), resample(&series(&shuffled)));
        }

        /// Every populated window holds at least one sample and starts are increasing
        #[test]
        fn test_no_zero_fill(pairs in prop::collection::vec((0.0f64..100.0, 1.0f64..10.0), 1..64)) {
            let out = resample(&series(&pairs));
            for point in out.points() {
                prop_assert!(point.count > 0);
                prop_assert!(pairs.iter().any(|(t, _)| t.floor() as i64 == point.window_start));
            }
            for w in out.points().windows(2) {
                prop_assert!(w[0].window_start < w[1].window_start);
            }
            let total: usize = out.points().iter().map(|p| p.count).sum();
            prop_assert_eq!(total, pairs.len());
        }

        /// A single-sample window reproduces the sample exactly
        #[test]
        fn test_single_sample_window(t in 0.0f64..1000.0, v in -1e12f64..1e12) {
            let out = resample(&series(&[(t, v)]));
            prop_assert_eq!(out.means(), vec![v]);
            prop_assert_eq!(out.window_starts(), vec![t.floor() as i64]);
        }
    }
}
