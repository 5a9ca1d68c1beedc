//! Carrier tracking status for the configured tracking sheets

use std::sync::Arc;

use async_trait::async_trait;
use sheetsync_domain::constants::{
    terminal_tracking_statuses, DELIVERED_STATUS, NO_TRACKING_QUEUES, READY_NO_TRACKING_MESSAGE,
    TICKET_NOT_FOUND_STATUS,
};
use sheetsync_domain::{
    Carrier, DesiredField, Record, Result, TicketKey, TrackingSheetConfig,
};
use tracing::{debug, info, warn};

use super::SyncJob;
use crate::carrier_ports::CarrierTracker;
use crate::erp_ports::ErpRepository;
use crate::reconcile::{BatchSummary, ReconciliationDriver, RowReconciler};

/// Failure label of the tracking job for `sheet`.
pub fn tracking_label(sheet: &TrackingSheetConfig) -> String {
    format!("{} Automation Failure", sheet.label)
}

pub struct TrackingJob {
    driver: Arc<ReconciliationDriver>,
    erp: Arc<dyn ErpRepository>,
    trackers: Vec<Arc<dyn CarrierTracker>>,
    sheet: TrackingSheetConfig,
    label: String,
}

impl TrackingJob {
    pub fn new(
        driver: Arc<ReconciliationDriver>,
        erp: Arc<dyn ErpRepository>,
        trackers: Vec<Arc<dyn CarrierTracker>>,
        sheet: TrackingSheetConfig,
    ) -> Self {
        let label = tracking_label(&sheet);
        Self { driver, erp, trackers, sheet, label }
    }
}

#[async_trait]
impl SyncJob for TrackingJob {
    fn label(&self) -> &str {
        &self.label
    }

    async fn run(&self) -> Result<BatchSummary> {
        let reconciler = TrackingReconciler {
            erp: self.erp.as_ref(),
            trackers: &self.trackers,
            sheet: &self.sheet,
            terminal: terminal_tracking_statuses(),
        };
        self.driver.run(self.sheet.sheet_id, &reconciler).await?.into_result()
    }
}

struct TrackingReconciler<'a> {
    erp: &'a dyn ErpRepository,
    trackers: &'a [Arc<dyn CarrierTracker>],
    sheet: &'a TrackingSheetConfig,
    terminal: [String; 5],
}

impl TrackingReconciler<'_> {
    fn tracker_for(&self, carrier: Carrier) -> Option<&dyn CarrierTracker> {
        self.trackers.iter().find(|t| t.carrier() == carrier).map(|t| t.as_ref())
    }

    /// Carrier status and delivery date fields for `tracking`.
    async fn carrier_fields(
        &self,
        key: &TicketKey,
        tracking: &str,
        record: &Record,
    ) -> Vec<DesiredField> {
        let Some(carrier) = Carrier::classify(tracking) else {
            debug!(ticket = %key, tracking, "Unrecognized tracking number");
            return Vec::new();
        };
        let Some(tracker) = self.tracker_for(carrier) else {
            debug!(ticket = %key, carrier = %carrier, "No tracking API for carrier");
            return Vec::new();
        };

        let report = match tracker.track(tracking, key).await {
            Ok(report) => report,
            Err(e) => {
                warn!(ticket = %key, carrier = %carrier, error = %e, "Tracking lookup failed");
                return Vec::new();
            }
        };

        let mut fields = Vec::new();
        let status = report.sheet_status();
        let current = record.text(&self.sheet.status_column);
        if !status.is_empty() && !current.trim().eq_ignore_ascii_case(DELIVERED_STATUS) {
            info!(ticket = %key, carrier = %carrier, status = %status, "Tracking status");
            fields.push(DesiredField::new(&self.sheet.status_column, status));
        }
        if let Some(date) = report.delivery_date {
            fields.push(DesiredField::new(
                &self.sheet.delivery_date_column,
                date.format("%Y-%m-%d").to_string(),
            ));
        } else if let Some(estimate) = &report.estimated_delivery {
            debug!(ticket = %key, estimate = %estimate, "Estimated delivery");
        }
        fields
    }
}

#[async_trait]
impl RowReconciler for TrackingReconciler<'_> {
    fn name(&self) -> &str {
        &self.sheet.label
    }

    fn key_column(&self) -> &str {
        &self.sheet.ticket_column
    }

    fn skip_reason(&self, record: &Record) -> Option<String> {
        let status = record.text(&self.sheet.status_column).trim().to_lowercase();
        self.terminal.contains(&status).then(|| format!("terminal status '{status}'"))
    }

    async fn desired_fields(&self, key: &TicketKey, record: &Record) -> Result<Vec<DesiredField>> {
        let Some(shipment) = self.erp.find_shipment(key).await? else {
            return Ok(vec![DesiredField::new(&self.sheet.status_column, TICKET_NOT_FOUND_STATUS)]);
        };

        match shipment.tracking() {
            Some(tracking) => {
                let mut fields = vec![DesiredField::new(&self.sheet.tracking_column, tracking.clone())];
                fields.extend(self.carrier_fields(key, &tracking, record).await);
                Ok(fields)
            }
            None if NO_TRACKING_QUEUES.contains(&shipment.queue.trim()) => Ok(vec![
                DesiredField::new(&self.sheet.status_column, READY_NO_TRACKING_MESSAGE),
            ]),
            None => Ok(Vec::new()),
        }
    }
}
