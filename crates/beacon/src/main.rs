//! Beacon - analytics event ingestion and recent-event query service
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (127.0.0.1:8115, ./app-metadata.json, ./data)
//! beacon
//!
//! # Run with a config file
//! beacon --config beacon.toml
//! ```

mod config;
mod serve;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use config::Config;

/// Analytics event ingestion and recent-event query service
#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.server.log_level);
    init_logging(log_level)?;

    serve::run(config).await
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}
