//! TOML configuration file support.
//!
//! Column rules and chart defaults can live in a file instead of being repeated
//! on every invocation:
//!
//! ```toml
//! # tsplot.toml
//! [render]
//! width = 1600
//! height = 900
//! window_seconds = 1
//!
//! [[columns]]
//! name = "forwarding_latencies"
//! unit = "ns-to-ms"
//! y_label = "Forward Latency (ms)"
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use tsplot::units::{ColumnPolicy, ColumnRule, UnitConversion};

/// Root configuration structure for tsplot.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Chart settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Per-column presentation rules, added to the built-in ones.
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

/// Chart settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Chart width in pixels.
    pub width: Option<u32>,

    /// Chart height in pixels.
    pub height: Option<u32>,

    /// Resampling window in whole seconds.
    pub window_seconds: Option<u32>,
}

/// Presentation rule for one column.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    /// Column name as it appears in the header (surrounding spaces ignored).
    pub name: String,

    /// Unit conversion, e.g. "ns-to-ms" or "x0.001".
    pub unit: Option<String>,

    /// Y-axis label replacing the column name.
    pub y_label: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Built-in column policy extended with this file's rules.
    pub fn column_policy(&self) -> Result<ColumnPolicy> {
        let mut policy = ColumnPolicy::default();
        for column in &self.columns {
            let unit = match &column.unit {
                Some(unit) => unit
                    .parse::<UnitConversion>()
                    .map_err(|e| anyhow!(e))
                    .with_context(|| format!("Invalid unit for column '{}'", column.name))?,
                None => UnitConversion::Identity,
            };
            policy.insert(
                &column.name,
                ColumnRule {
                    unit,
                    y_label: column.y_label.clone(),
                },
            );
        }
        Ok(policy)
    }
}
