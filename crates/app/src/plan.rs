//! Which jobs a run at a given instant should execute

use chrono::{DateTime, Utc};
use sheetsync_core::{
    tracking_label, Schedule, CLEAR_HELPERS_LABEL, SERIAL_NUMBER_LABEL, TICKET_DATA_LABEL,
};
use sheetsync_domain::{Result, SheetsConfig, TrackingSheetConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPlan {
    /// Serial number and ticket data jobs.
    pub main_jobs: bool,
    /// Helper sheets to empty; only ever set alongside the main jobs.
    pub helper_sheets: Vec<u64>,
    /// Tracking sheets due now, in configuration order.
    pub tracking: Vec<TrackingSheetConfig>,
}

impl JobPlan {
    pub fn for_time(
        schedule: &Schedule,
        sheets: &SheetsConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let main_jobs = schedule.main_jobs_due(now);
        let helper_sheets = if main_jobs { sheets.helper_sheet_ids.clone() } else { Vec::new() };
        let tracking = schedule.tracking_due(now, &sheets.tracking)?.into_iter().cloned().collect();
        Ok(Self { main_jobs, helper_sheets, tracking })
    }

    pub fn is_empty(&self) -> bool {
        !self.main_jobs && self.tracking.is_empty()
    }

    /// Failure labels of the planned jobs, in run order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.main_jobs {
            labels.push(SERIAL_NUMBER_LABEL.to_string());
            labels.push(TICKET_DATA_LABEL.to_string());
        }
        if !self.helper_sheets.is_empty() {
            labels.push(CLEAR_HELPERS_LABEL.to_string());
        }
        labels.extend(self.tracking.iter().map(tracking_label));
        labels
    }
}
