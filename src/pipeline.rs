//! # Plot Pipeline
//!
//! Runs load → resample → render for one column of one log. Each stage fully
//! consumes its input before the next begins; nothing is shared between runs.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::loader::{LoaderError, TimeSeriesLoader};
use crate::render::{render, RenderError, RenderOptions};
use crate::resample::{Resampler, WindowWidth};
use crate::units::{default_title, ColumnPolicy, UnitConversion};

/// Errors that end a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Reading or decoding the log failed
    #[error(transparent)]
    LoaderError(#[from] LoaderError),

    /// Drawing or writing the chart failed
    #[error(transparent)]
    RenderError(#[from] RenderError),
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStats {
    /// Data rows read from the log
    pub rows: usize,
    /// Rows that carried a value for the column
    pub samples: usize,
    /// Populated windows plotted
    pub windows: usize,
    /// Empty windows inside the plotted span
    pub gaps: usize,
    /// Conversion applied to the means
    pub unit: UnitConversion,
    /// Chart file written
    pub output: PathBuf,
}

impl fmt::Display for PlotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Plotted {} windows ({} gaps) from {} samples in {} rows to {}",
            self.windows,
            self.gaps,
            self.samples,
            self.rows,
            self.output.display()
        )
    }
}

/// Overrides applied on top of the [`ColumnPolicy`]
#[derive(Debug, Clone, Default)]
pub struct PlotOverrides {
    pub unit: Option<UnitConversion>,
    pub y_label: Option<String>,
    pub title: Option<String>,
    pub size: Option<(u32, u32)>,
}

/// Configured load → resample → render run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    loader: TimeSeriesLoader,
    resampler: Resampler,
    policy: ColumnPolicy,
    overrides: PlotOverrides,
}

impl Pipeline {
    /// Pipeline with one-second windows and the default column policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(mut self, loader: TimeSeriesLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_window(mut self, width: WindowWidth) -> Self {
        self.resampler = self.resampler.with_width(width);
        self
    }

    pub fn with_policy(mut self, policy: ColumnPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_overrides(mut self, overrides: PlotOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Render options for `column`, policy first, then overrides
    pub fn render_options(&self, column: &str, output: &Path) -> RenderOptions {
        let mut options = self.policy.render_options(column, output);
        if let Some(unit) = self.overrides.unit {
            options = options.unit(unit);
        }
        if let Some(label) = &self.overrides.y_label {
            options = options.y_label(label.clone());
        }
        if let Some(title) = &self.overrides.title {
            options = options.title(title.clone());
        }
        if let Some((width, height)) = self.overrides.size {
            options = options.size(width, height);
        }
        if options.title.is_empty() {
            options = options.title(default_title(column));
        }
        options
    }

    /// Plot `column` of the log at `input` into `output`.
    ///
    /// Nothing is written unless every stage succeeds.
    pub fn run(&self, input: &Path, column: &str, output: &Path) -> Result<PlotStats, PlotError> {
        let series = self.loader.load_file(input, column)?;
        info!("Loaded {} rows from {}", series.len(), input.display());

        let options = self.render_options(column, output);
        if options.unit != UnitConversion::Identity {
            debug!(
                "Converting '{}' with {}: {:?}",
                column,
                options.unit,
                series.samples().iter().take(10).collect::<Vec<_>>()
            );
        }

        let resampled = self.resampler.resample(&series);
        info!("{}", resampled);

        render(&resampled, &options)?;

        Ok(PlotStats {
            rows: series.len(),
            samples: series.samples().iter().filter(|s| s.has_value()).count(),
            windows: resampled.len(),
            gaps: resampled.gap_count(),
            unit: options.unit,
            output: output.to_path_buf(),
        })
    }
}

/// Plot `column` of `input` into `output` with the default pipeline.
pub fn plot(input: &Path, column: &str, output: &Path) -> Result<PlotStats, PlotError> {
    Pipeline::new().run(input, column, output)
}
