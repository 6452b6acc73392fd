use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use tzwindow_core::run_once;

use crate::cli::RunArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::state::JsonStateStore;

#[derive(Debug, Serialize)]
struct RunOutput {
    tenants: usize,
    inserted: usize,
    failed: usize,
}

pub fn run_poll(args: RunArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let store = JsonStateStore::load(Path::new(&args.state))
        .map_err(|e| CliError::runtime(format!("{:#}", e)))?;

    if args.once {
        let summary = run_once(&store, Utc::now())
            .map_err(|e| CliError::runtime(format!("Materialization pass failed: {}", e)))?;
        let output = RunOutput {
            tenants: summary.tenants,
            inserted: summary.inserted,
            failed: summary.failed,
        };
        match output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&output)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!(
                    "{} tenant(s): {} window(s) inserted, {} failed",
                    output.tenants, output.inserted, output.failed
                );
            }
        }
        return Ok(ExitCode::from(EXIT_SUCCESS));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(poll_loop(&store, args.interval_secs));
    Ok(ExitCode::from(EXIT_SUCCESS))
}

/// Materialize eagerly, then on every tick. A failed pass is logged and
/// retried on the next tick; it never exits the loop.
async fn poll_loop(store: &JsonStateStore, interval_secs: u64) {
    info!(interval_secs, "window scheduler started");
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;
        match run_once(store, Utc::now()) {
            Ok(summary) => {
                if summary.inserted > 0 || summary.failed > 0 {
                    info!(
                        tenants = summary.tenants,
                        inserted = summary.inserted,
                        failed = summary.failed,
                        "materialization pass finished"
                    );
                }
            }
            Err(err) => {
                warn!(error = %err, "materialization pass failed");
            }
        }
    }
}
