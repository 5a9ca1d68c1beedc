//! SheetSync - one scheduled reconciliation run
//!
//! Meant to be started by an external scheduler every few minutes. Each run
//! decides from the local time which jobs are due.

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use sheetsync_core::Schedule;
use sheetsync_infra::{config, init_logging};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // .env is optional, real environment variables win
    let dotenv = dotenvy::dotenv();

    let config = config::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let now = Utc::now();
    let schedule = Schedule::from_config(&config.schedule)?;
    let today = now.with_timezone(&schedule.timezone()).date_naive();
    let _log_guard = init_logging(&config.logging, today)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => info!(error = %e, "No .env file loaded"),
    }
    info!(version = env!("CARGO_PKG_VERSION"), "SheetSync starting");

    let report = sheetsync_app::run(config, now).await?;

    if report.has_failures() {
        warn!(failed = report.failed.len(), "Run finished with failures");
        return Ok(ExitCode::FAILURE);
    }
    info!(completed = report.completed.len(), "Run finished");
    Ok(ExitCode::SUCCESS)
}
