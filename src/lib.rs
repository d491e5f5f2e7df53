//! # tsplot - Per-Window Averages of Timestamped Measurement Logs
//!
//! `tsplot` turns a CSV measurement log, such as the per-second monitor output of a
//! replicated key-value store, into a line chart of one column averaged over
//! fixed time windows.
//!
//! ## Pipeline
//!
//! 1. **Load** ([`loader`]): the first column is read as a Unix timestamp and
//!    rebased so the first row sits at `0.0` seconds; the requested column is
//!    read as `f64`.
//! 2. **Resample** ([`resample`]): samples are bucketed into windows
//!    `[k, k + 1)` seconds and averaged. Empty windows stay empty.
//! 3. **Render** ([`render`]): means are passed through a [`units::UnitConversion`]
//!    and drawn as an SVG line chart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tsplot::loader::TimeSeriesLoader;
//! use tsplot::resample::resample;
//! use tsplot::render::render;
//! use tsplot::units::ColumnPolicy;
//!
//! let series = TimeSeriesLoader::new().load_file("monitor_0_0.csv", "forwarding_latencies")?;
//! let resampled = resample(&series);
//!
//! // Nanoseconds are plotted as milliseconds by the default policy
//! let options = ColumnPolicy::default().render_options("forwarding_latencies", "latency.svg");
//! render(&resampled, &options)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Or in one call:
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let stats = tsplot::pipeline::plot(
//!     Path::new("monitor_0_0.csv"),
//!     "forwarding_latencies",
//!     Path::new("latency.svg"),
//! )?;
//! println!("{}", stats);
//! # Ok::<(), tsplot::pipeline::PlotError>(())
//! ```

pub mod loader;
pub mod pipeline;
pub mod render;
pub mod resample;
pub mod series;
pub mod units;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::loader::{CellValue, LoaderError, RawRow, TimeSeriesLoader};
    pub use crate::pipeline::{plot, Pipeline, PlotError, PlotOverrides, PlotStats};
    pub use crate::render::{render, ChartSpec, RenderError, RenderOptions};
    pub use crate::resample::{resample, Resampler, WindowWidth};
    pub use crate::series::{ResampledPoint, ResampledSeries, Sample, TimeSeries};
    pub use crate::units::{ColumnPolicy, ColumnRule, UnitConversion};
}
