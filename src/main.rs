use anyhow::Context;
use clap::Parser;
use tracing::info;

use txn_quality::{console, logging, Config, Pipeline, PipelinePaths};

/// Reads data/raw_data1.csv, validates it against data/schema.json and
/// writes the cleaned, invalid and report artifacts to outputs/.
#[derive(Parser)]
#[command(name = "txn_quality")]
#[command(about = "Transaction data quality pipeline")]
#[command(version)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    let config = Config::load().context("loading config.toml")?;
    let _log_guard = logging::init_logging(&config.logging);

    let paths = PipelinePaths::default();
    info!(input = %paths.input.display(), schema = %paths.schema.display(), "Starting quality run");

    let pipeline = Pipeline::new(paths, config);
    let result = pipeline.run().context("quality pipeline failed")?;

    console::print_standardized_preview(&result);
    console::print_validation_summary(&result);
    console::print_saved(&result);

    Ok(())
}
