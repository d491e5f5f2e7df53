use anyhow::{anyhow, Context, Result};
use log::info;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use tsplot::pipeline::{Pipeline, PlotOverrides, PlotStats};
use tsplot::resample::WindowWidth;
use tsplot::units::{ColumnPolicy, UnitConversion};

use super::config::Config;

/// Arguments of a single plot run
pub struct PlotArgs {
    pub input: PathBuf,
    pub column: String,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub window: Option<u32>,
    pub unit: Option<UnitConversion>,
    pub y_label: Option<String>,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Plot one column of a measurement log
pub fn run(args: PlotArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let pipeline = build_pipeline(&args, &config)?;

    info!("tsplot");
    info!("======");
    info!("Input:  {}", args.input.display());
    info!("Column: {}", args.column);
    info!("Output: {}", args.output.display());

    let stats = pipeline
        .run(&args.input, &args.column, &args.output)
        .with_context(|| format!("Failed to plot '{}'", args.column))?;

    info!("{}", stats);
    println!("{}", format_summary(&stats));
    Ok(())
}

/// Combine CLI flags and config file, flags taking precedence
fn build_pipeline(args: &PlotArgs, config: &Config) -> Result<Pipeline> {
    let policy: ColumnPolicy = config.column_policy()?;

    let window_seconds = args.window.or(config.render.window_seconds).unwrap_or(1);
    let window = WindowWidth::from_seconds(window_seconds)
        .ok_or_else(|| anyhow!("Window must be at least one second"))?;

    let width = args.width.or(config.render.width);
    let height = args.height.or(config.render.height);
    let size = match (width, height) {
        (None, None) => None,
        (w, h) => {
            let (default_w, default_h) = tsplot::render::DEFAULT_SIZE;
            Some((w.unwrap_or(default_w), h.unwrap_or(default_h)))
        }
    };

    Ok(Pipeline::new()
        .with_window(window)
        .with_policy(policy)
        .with_overrides(PlotOverrides {
            unit: args.unit,
            y_label: args.y_label.clone(),
            title: args.title.clone(),
            size,
        }))
}

fn format_summary(stats: &PlotStats) -> String {
    #[cfg(feature = "colorized_output")]
    {
        format!(
            "{} {} windows ({} gaps, unit {}) -> {}",
            style("Plotted").bold().green(),
            style(stats.windows).cyan(),
            style(stats.gaps).yellow(),
            stats.unit,
            style(stats.output.display()).bold()
        )
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        stats.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args() -> PlotArgs {
        PlotArgs {
            input: PathBuf::from("monitor.csv"),
            column: "forwarding_latencies".to_string(),
            output: PathBuf::from("latency.svg"),
            config: None,
            window: None,
            unit: None,
            y_label: None,
            title: None,
            width: None,
            height: None,
        }
    }

    #[test]
    fn test_defaults() {
        let pipeline = build_pipeline(&args(), &Config::default()).unwrap();
        let options = pipeline.render_options("forwarding_latencies", Path::new("latency.svg"));
        assert_eq!(options.unit, UnitConversion::NanosToMillis);
        assert_eq!(options.y_label, "Forward Latency (ms)");
        assert_eq!(options.size, tsplot::render::DEFAULT_SIZE);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::from_str(
            r#"
            [render]
            width = 1000
            height = 500

            [[columns]]
            name = "forwarding_latencies"
            unit = "ns-to-us"
            "#,
        )
        .unwrap();

        let mut args = args();
        args.width = Some(640);
        args.unit = Some(UnitConversion::Identity);

        let options = build_pipeline(&args, &config)
            .unwrap()
            .render_options("forwarding_latencies", Path::new("latency.svg"));
        assert_eq!(options.size, (640, 500));
        assert_eq!(options.unit, UnitConversion::Identity);
    }

    #[test]
    fn test_zero_window_from_config_rejected() {
        let config = Config::from_str("[render]\nwindow_seconds = 0\n").unwrap();
        assert!(build_pipeline(&args(), &config).is_err());
    }

    #[test]
    fn test_missing_input() {
        let mut args = args();
        args.input = PathBuf::from("/nonexistent/monitor.csv");
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("Input file does not exist"));
    }
}
