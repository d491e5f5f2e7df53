//! # Render Module for tsplot
//!
//! Turns a [`ResampledSeries`] into a line chart and writes it as SVG.
//!
//! ## Output Guarantees
//!
//! - The chart is drawn in memory and written through a temporary file in the
//!   output directory, then renamed over the target. A failed run leaves any
//!   previous file untouched and never exposes a half-written chart.
//! - An empty series still produces a chart with axes, labels and title.
//! - Missing windows break the line; isolated windows are drawn as markers.

mod error;


use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tempfile::{Builder, NamedTempFile};

use crate::series::ResampledSeries;
use crate::units::UnitConversion;

pub use error::RenderError;

/// Label of the x axis.
pub const TIME_AXIS_LABEL: &str = "Time (s)";

/// Default chart size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1280, 720);

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// What to draw and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Conversion applied to every mean before plotting
    pub unit: UnitConversion,
    pub y_label: String,
    pub title: String,
    /// Chart file, overwritten on success
    pub output: PathBuf,
    /// Width and height in pixels
    pub size: (u32, u32),
}

impl RenderOptions {
    /// Options with identity units and empty labels
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            unit: UnitConversion::Identity,
            y_label: String::new(),
            title: String::new(),
            output: output.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn unit(mut self, unit: UnitConversion) -> Self {
        self.unit = unit;
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width.max(1), height.max(1));
        self
    }
}

/// A fully resolved chart, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Window starts in seconds
    pub x: Vec<i64>,
    /// Converted means
    pub y: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    pub output: PathBuf,
    pub size: (u32, u32),
    /// Index ranges of adjacent windows, drawn as separate lines
    pub segments: Vec<Range<usize>>,
}

impl ChartSpec {
    /// Resolve `series` against `options`, converting every mean
    pub fn new(series: &ResampledSeries, options: &RenderOptions) -> Self {
        Self {
            x: series.window_starts(),
            y: series
                .points()
                .iter()
                .map(|p| options.unit.apply(p.mean))
                .collect(),
            x_label: TIME_AXIS_LABEL.to_string(),
            y_label: options.y_label.clone(),
            title: options.title.clone(),
            output: options.output.clone(),
            size: options.size,
            segments: series.contiguous_runs(),
        }
    }

    /// `(x, y)` pairs of one segment
    fn segment_points(&self, range: Range<usize>) -> Vec<(f64, f64)> {
        self.x[range.clone()]
            .iter()
            .zip(&self.y[range])
            .map(|(&x, &y)| (x as f64, y))
            .collect()
    }

    fn x_range(&self) -> Range<f64> {
        let lo = self.x.first().copied().unwrap_or(0).min(0) as f64;
        let hi = self.x.last().copied().unwrap_or(0) as f64;
        if hi > lo {
            lo..hi
        } else {
            lo..lo + 1.0
        }
    }

    fn y_range(&self) -> Range<f64> {
        let finite = self.y.iter().copied().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if lo > hi {
            return 0.0..1.0;
        }
        let pad = if hi > lo {
            (hi - lo) * 0.05
        } else if lo == 0.0 {
            1.0
        } else {
            lo.abs() * 0.1
        };
        (lo - pad)..(hi + pad)
    }
}

/// Convert, draw and write `series` as described by `options`.
pub fn render(series: &ResampledSeries, options: &RenderOptions) -> Result<(), RenderError> {
    render_chart(&ChartSpec::new(series, options))
}

/// Draw `spec` and write it to `spec.output`.
pub fn render_chart(spec: &ChartSpec) -> Result<(), RenderError> {
    if spec.output.extension().and_then(|e| e.to_str()) != Some("svg") {
        warn!(
            "Output {} does not end in .svg; writing SVG anyway",
            spec.output.display()
        );
    }

    let svg = draw_svg(spec)?;
    write_atomically(&spec.output, svg.as_bytes())?;

    debug!(
        "Wrote chart '{}' with {} points in {} segments to {}",
        spec.title,
        spec.x.len(),
        spec.segments.len(),
        spec.output.display()
    );
    Ok(())
}

/// Draw `spec` into an SVG document held in memory.
pub fn draw_svg(spec: &ChartSpec) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, spec.size).into_drawing_area();
        draw_chart(&root, spec).map_err(|e| RenderError::DrawingError(e.to_string()))?;
        root.present()
            .map_err(|e| RenderError::DrawingError(e.to_string()))?;
    }
    Ok(svg)
}

fn draw_chart(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    spec: &ChartSpec,
) -> Result<(), DrawingAreaErrorKind<std::io::Error>> {
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(spec.x_range(), spec.y_range())?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.3}", v))
        .draw()?;

    for range in &spec.segments {
        let points = spec.segment_points(range.clone());
        if points.len() == 1 {
            chart.draw_series(std::iter::once(Circle::new(
                points[0],
                3,
                LINE_COLOR.filled(),
            )))?;
        } else {
            chart.draw_series(LineSeries::new(points, LINE_COLOR.stroke_width(2)))?;
        }
    }

    Ok(())
}

/// Replace `path` with `contents` without exposing a partial file.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), RenderError> {
    let write_error = |source: std::io::Error| RenderError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = create_temp_file(dir, path).map_err(write_error)?;
    temp_file.write_all(contents).map_err(write_error)?;
    temp_file.as_file().sync_all().map_err(write_error)?;
    temp_file
        .persist(path)
        .map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Temp file next to `target` whose mode matches what a plain create would give.
///
/// On unix the file is opened with `0o666` so the process umask applies, and an
/// existing regular target keeps its permissions across the rename.
fn create_temp_file(dir: &Path, target: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".tsplot");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let temp_file = builder.tempfile_in(dir)?;

    #[cfg(unix)]
    {
        if let Ok(meta) = std::fs::metadata(target) {
            if meta.is_file() {
                temp_file.as_file().set_permissions(meta.permissions())?;
            }
        }
    }
    #[cfg(not(unix))]
    let _ = target;

    Ok(temp_file)
}
