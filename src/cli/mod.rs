use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use tsplot::units::UnitConversion;

mod config;
mod plot;

/// tsplot - Plot per-second averages of a timestamped CSV measurement log
#[derive(Debug, Parser)]
#[command(name = "tsplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input CSV file (first column is a Unix timestamp)
    #[arg(short = 'i', long, value_name = "FILE")]
    input: PathBuf,

    /// Column to plot
    #[arg(short = 'y', long, value_name = "NAME")]
    column: String,

    /// Output chart file (SVG)
    #[arg(short = 'o', long = "outfile", visible_alias = "output", value_name = "FILE")]
    output: PathBuf,

    /// Load column rules and chart settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resampling window in whole seconds (default: 1)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(1..))]
    window: Option<u32>,

    /// Unit conversion for the plotted values (none, ns-to-ms, ns-to-us, us-to-ms, s-to-ms, x<factor>)
    #[arg(long, value_name = "UNIT")]
    unit: Option<UnitConversion>,

    /// Y-axis label (defaults to the column name or its configured label)
    #[arg(long, value_name = "TEXT")]
    y_label: Option<String>,

    /// Chart title (defaults to "Average <column> over time")
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Chart width in pixels
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Chart height in pixels
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    plot::run(plot::PlotArgs {
        input: cli.input,
        column: cli.column,
        output: cli.output,
        config: cli.config,
        window: cli.window,
        unit: cli.unit,
        y_label: cli.y_label,
        title: cli.title,
        width: cli.width,
        height: cli.height,
    })
}
