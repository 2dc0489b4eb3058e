//! RepoScanExec: repository scanner collecting per-entry coverage and type data.
//!
//! Thin binary entry point. All logic lives in the `reposcan-core` and
//! `reposcan-cli` crates.

use clap::Parser;
use reposcan_cli::ScanArgs;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Flag errors exit with clap's own status (2) before logging starts.
    let args = ScanArgs::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    tracing::info!("RepoScanExec {} starting", env!("CARGO_PKG_VERSION"));

    match reposcan_cli::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
