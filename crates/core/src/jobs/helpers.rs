//! Scratch sheets emptied before the main jobs refill them

use std::sync::Arc;

use async_trait::async_trait;
use sheetsync_domain::{Result, SheetSyncError};
use tracing::info;

use super::SyncJob;
use crate::reconcile::{BatchSummary, ReconciliationDriver};

pub const CLEAR_HELPERS_LABEL: &str = "Clear Helpers Automation Failure";

/// Deletes every row of each helper sheet.
///
/// A sheet that cannot be fetched fails the job at once. Rows whose delete
/// batch exhausted its retries are counted as failed and reported together
/// once every sheet has been visited.
pub struct ClearHelperSheetsJob {
    driver: Arc<ReconciliationDriver>,
    sheet_ids: Vec<u64>,
}

impl ClearHelperSheetsJob {
    pub fn new(driver: Arc<ReconciliationDriver>, sheet_ids: Vec<u64>) -> Self {
        Self { driver, sheet_ids }
    }
}

#[async_trait]
impl SyncJob for ClearHelperSheetsJob {
    fn label(&self) -> &str {
        CLEAR_HELPERS_LABEL
    }

    async fn run(&self) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        let mut leftovers = Vec::new();

        for &sheet_id in &self.sheet_ids {
            let sheet = self.driver.fetch_sheet(sheet_id).await?;
            info!(sheet_id, sheet = %sheet.name, rows = sheet.rows.len(), "Clearing helper sheet");

            let row_ids: Vec<u64> = sheet.rows.iter().map(|row| row.id).collect();
            let not_deleted = self.driver.delete_rows(sheet_id, &row_ids).await;

            summary.processed += row_ids.len();
            summary.updated += row_ids.len() - not_deleted;
            summary.failed += not_deleted;
            if not_deleted > 0 {
                leftovers.push(format!("{} ({not_deleted} rows)", sheet.name));
            }
        }

        if !leftovers.is_empty() {
            return Err(SheetSyncError::Network(format!(
                "Failed to delete rows in {} after retries",
                leftovers.join(", ")
            )));
        }
        Ok(summary)
    }
}
