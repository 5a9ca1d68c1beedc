//! Sheet synchronization jobs and the run loop around them

pub mod helpers;
pub mod runner;
pub mod schedule;
pub mod serials;
pub mod ticket_data;
pub mod tracking;

use std::time::Duration;

use async_trait::async_trait;
use sheetsync_common::resilience::RetryPolicy;
use sheetsync_domain::{Result, RetrySettings, SheetSyncError};

use crate::reconcile::BatchSummary;

pub use helpers::{ClearHelperSheetsJob, CLEAR_HELPERS_LABEL};
pub use runner::{FailureDigest, JobRunner, RunReport};
pub use schedule::{is_time_between, Schedule};
pub use serials::{format_serials, SerialNumberJob, SERIAL_NUMBER_LABEL};
pub use ticket_data::{TicketDataJob, TICKET_DATA_LABEL};
pub use tracking::{tracking_label, TrackingJob};

/// One schedulable unit of work.
#[async_trait]
pub trait SyncJob: Send + Sync {
    /// Heading used for this job in the failure report.
    fn label(&self) -> &str;

    async fn run(&self) -> Result<BatchSummary>;
}

/// Build the invoker policy from configuration.
pub fn retry_policy(settings: &RetrySettings) -> Result<RetryPolicy> {
    RetryPolicy::builder()
        .max_attempts(settings.max_attempts)
        .rate_limit_backoff(
            Duration::from_secs(settings.rate_limit_base_secs),
            Duration::from_secs(settings.rate_limit_max_secs),
        )
        .server_error_backoff(
            Duration::from_secs(settings.server_error_base_secs),
            Duration::from_secs(settings.server_error_max_secs),
        )
        .jitter_ceiling(Duration::from_secs(settings.jitter_ceiling_secs))
        .build()
        .map_err(|e| SheetSyncError::Config(e.to_string()))
}
