//! Command-line entry point — `prepare-data <INPUT_DIR> <OUTPUT_DIR>`.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`).
//! 2. Parse the two positional arguments; any other argument count exits
//!    non-zero with a usage diagnostic.
//! 3. Seed the subsampling RNG from the wall clock.  Reproducible runs go
//!    through [`doa_dataprep::pipeline::run`] with a fixed seed instead.
//! 4. Run the sequential pipeline; any failure terminates the process with
//!    a diagnostic and non-zero exit.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;

use doa_dataprep::config::OUT_DROP_PERCENT;
use doa_dataprep::pipeline;

/// Convert raw microphone-array recordings into labeled training chunks.
#[derive(Parser)]
#[command(name = "prepare-data", version)]
struct Cli {
    /// Directory containing the raw recordings (output-*.raw)
    input_dir: PathBuf,
    /// Root of the dataset tree to populate
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Arguments
    let cli = Cli::parse();

    // 3. Subsampling seed
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the epoch")?
        .as_nanos() as u64;

    log::info!(
        "preparing dataset: {} -> {}",
        cli.input_dir.display(),
        cli.output_dir.display()
    );

    // 4. Run
    let summary = pipeline::run(&cli.input_dir, &cli.output_dir, seed, OUT_DROP_PERCENT)
        .context("dataset preparation failed")?;

    log::info!(
        "done: {} recording(s), {} chunk(s) accepted, {} dataset file(s) written",
        summary.files,
        summary.chunks_accepted,
        summary.files_written
    );
    Ok(())
}
