//! # tsplot
//!
//! Plots one column of a timestamped CSV measurement log, averaged per second.
//!
//! ## Usage
//!
//! ```bash
//! # Forwarding latency of replica 0, nanoseconds shown as milliseconds
//! tsplot -i monitor_0_0.csv -y forwarding_latencies -o latency.svg
//!
//! # Any other column is plotted as logged
//! tsplot -i monitor_0_0.csv -y channel_size -o channel.svg --window 5
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
