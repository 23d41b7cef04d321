//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `web_tester` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Reading the target URI from stdin
//! - Printing the report, or a single `Error: ...` line and exit code 1
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio::io::{AsyncBufReadExt, BufReader};

use web_tester::initialization::init_logger_with;
use web_tester::{run_probe, Opt, ProbeError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let outcome = match read_target_uri().await {
        Ok(uri) => run_probe(&uri, &opt.probe_options()).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => {
            print!("{report}");
            Ok(())
        }
        Err(e) => {
            log::debug!("Probe failed ({:?})", e.category());
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Reads the first line of stdin as the target URI.
async fn read_target_uri() -> Result<String, ProbeError> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|e| ProbeError::Unexpected(format!("Failed to read stdin: {e}")))?;

    let uri = line.trim();
    if uri.is_empty() {
        return Err(ProbeError::InvalidUri(
            "No URI provided on stdin".to_string(),
        ));
    }
    Ok(uri.to_string())
}
