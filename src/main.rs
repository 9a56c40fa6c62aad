//! rustpubmed - PubMed Affiliation Pipeline
//!
//! Searches PubMed and lists papers with at least one author affiliated with
//! a pharmaceutical or biotech company.
//!
//! ## Usage
//!
//! ```bash
//! rustpubmed "cancer immunotherapy" --file results.csv
//! rustpubmed "cancer immunotherapy" --debug
//! ```

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use rustpubmed::{config::PipelineConfig, pipeline};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Find PubMed papers with non-academic (company) authors
#[derive(Parser)]
#[command(name = "rustpubmed")]
#[command(version, about, long_about = None)]
struct Cli {
    /// PubMed search query (full PubMed query syntax)
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    query: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// CSV file to write; records are printed to the console when omitted
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so printed records stay clean on stdout
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    let config = PipelineConfig::default();
    debug!(config = ?config, "Starting pipeline");

    let records = pipeline::run(&config, &cli.query, cli.file.as_deref()).await;
    debug!(count = records.len(), "Pipeline finished");

    Ok(())
}
