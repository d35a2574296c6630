//! Quote engine replay - Entry Point

use std::fs::File;
use std::io::{self, BufReader, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use skew_mm::QuoterConfig;
use tracing::info;

/// Replay recorded prices and fills through the quote engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SKEW_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON-lines event file; reads stdin when omitted
    #[arg(short, long)]
    events: Option<String>,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    metrics: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    skew_telemetry::init_logging()?;

    info!("Starting skew-replay v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > SKEW_CONFIG env var > built-in defaults
    let config = match args.config.or_else(|| std::env::var("SKEW_CONFIG").ok()) {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            QuoterConfig::from_file(&path)?
        }
        None => QuoterConfig::default(),
    };

    let mut replayer = skew_replay::Replayer::new(config)?;
    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());

    match &args.events {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
            replayer.run(BufReader::new(file), output)?;
        }
        None => {
            replayer.run(io::stdin().lock(), output)?;
        }
    }

    replayer.log_summary();

    if args.metrics {
        eprint!("{}", skew_telemetry::Metrics::gather_text()?);
    }

    Ok(())
}
