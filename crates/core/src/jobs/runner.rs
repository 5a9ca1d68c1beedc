//! Sequential job runner and the end-of-run failure notification

use std::fmt;
use std::sync::Arc;

use sheetsync_common::error::ErrorClassification;
use sheetsync_domain::{Notification, NotificationConfig, Result};
use tracing::{error, info, warn};

use super::SyncJob;
use crate::notification_ports::Notifier;
use crate::reconcile::BatchSummary;

/// Accumulated failure text for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureDigest {
    text: String,
}

impl FailureDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: &str, error: impl fmt::Display) {
        self.text.push_str(&format!("{label}:\n\n{error}\n\n"));
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for FailureDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub completed: Vec<(String, BatchSummary)>,
    pub failed: Vec<String>,
    pub digest: FailureDigest,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.digest.is_empty()
    }
}

pub struct JobRunner {
    notifier: Arc<dyn Notifier>,
    notification: NotificationConfig,
}

impl JobRunner {
    pub fn new(notifier: Arc<dyn Notifier>, notification: NotificationConfig) -> Self {
        Self { notifier, notification }
    }

    /// Run `jobs` one after another. A failing job never stops the ones
    /// after it.
    pub async fn run_all(&self, jobs: &[Arc<dyn SyncJob>]) -> RunReport {
        let mut report = RunReport::default();
        for job in jobs {
            let label = job.label();
            info!(job = label, "Starting job");
            match job.run().await {
                Ok(summary) => {
                    info!(
                        job = label,
                        processed = summary.processed,
                        updated = summary.updated,
                        "Job finished"
                    );
                    report.completed.push((label.to_string(), summary));
                }
                Err(e) => {
                    error!(job = label, severity = %e.severity(), error = %e, "Job failed");
                    report.digest.push(label, &e);
                    report.failed.push(label.to_string());
                }
            }
        }
        report
    }

    /// Send one notification carrying the digest, if there is anything in it.
    pub async fn notify_failures(&self, digest: &FailureDigest) -> Result<bool> {
        if digest.is_empty() {
            return Ok(false);
        }
        let notification = Notification {
            subject: self.notification.subject.clone(),
            body: digest.to_string(),
            recipients: self.notification.recipients.clone(),
            cc: self.notification.cc.clone(),
        };
        if let Err(e) = self.notifier.send(&notification).await {
            warn!(error = %e, "Failed to send failure notification");
            return Err(e);
        }
        info!(recipients = notification.recipients.len(), "Failure notification sent");
        Ok(true)
    }

    /// [`run_all`](Self::run_all) followed by
    /// [`notify_failures`](Self::notify_failures). Notification errors are
    /// logged, not returned.
    pub async fn run_and_report(&self, jobs: &[Arc<dyn SyncJob>]) -> RunReport {
        let report = self.run_all(jobs).await;
        if let Err(e) = self.notify_failures(&report.digest).await {
            error!(error = %e, "Run failures could not be reported");
        }
        report
    }
}
