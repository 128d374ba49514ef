//! fw-gen: build-time firmware table generator

use anyhow::Result;
use clap::Parser;
use fwgen_cli::cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let report = cli.run()?;

    println!(
        "Wrote {}: {} entries, {} blobs ({} duplicate files, {} bytes saved by dedupe)",
        report.output.display(),
        report.stats.files_total,
        report.stats.unique_blobs,
        report.stats.duplicate_files,
        report.stats.bytes_saved_by_dedup
    );
    Ok(())
}
