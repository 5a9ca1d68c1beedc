//! Serial numbers allocated in the ERP, written to the order sheet

use std::sync::Arc;

use async_trait::async_trait;
use sheetsync_domain::constants::{
    ALLOCATABLE_STATUSES, ALLOCATED_STATUS, MAC_CHECK_COMPLETE, MAC_CHECK_REQUIRED,
    PHONES_EQUIPMENT_TYPE,
};
use sheetsync_domain::utils::{device_display_name, device_item_numbers, is_mac_address};
use sheetsync_domain::{
    DesiredField, OrderColumns, Record, Result, SerialLine, SerialScope, TicketKey,
};
use tracing::info;

use super::SyncJob;
use crate::erp_ports::ErpRepository;
use crate::reconcile::{BatchSummary, ReconciliationDriver, RowReconciler};

pub const SERIAL_NUMBER_LABEL: &str = "Serial Number Automation Failure";

/// Render serial lines for the sheet.
///
/// Each new item opens a `[ name ]` heading, consecutive lines of the same
/// item only add their serial.
pub fn format_serials(lines: &[SerialLine]) -> String {
    let mut parts = Vec::with_capacity(lines.len());
    let mut current_item: Option<&str> = None;
    for line in lines {
        let item = line.item_number.trim();
        let serial = line.serial_number.trim().to_uppercase();
        if current_item == Some(item) {
            parts.push(serial);
        } else {
            parts.push(format!("\n[ {} ] \n{serial}", device_display_name(item)));
            current_item = Some(item);
        }
    }
    parts.join(" \n").trim().replace('"', "")
}

pub struct SerialNumberJob {
    driver: Arc<ReconciliationDriver>,
    erp: Arc<dyn ErpRepository>,
    order_sheet_id: u64,
    configuration_queues: Vec<String>,
    columns: OrderColumns,
}

impl SerialNumberJob {
    pub fn new(
        driver: Arc<ReconciliationDriver>,
        erp: Arc<dyn ErpRepository>,
        order_sheet_id: u64,
        configuration_queues: Vec<String>,
        columns: OrderColumns,
    ) -> Self {
        Self { driver, erp, order_sheet_id, configuration_queues, columns }
    }
}

#[async_trait]
impl SyncJob for SerialNumberJob {
    fn label(&self) -> &str {
        SERIAL_NUMBER_LABEL
    }

    async fn run(&self) -> Result<BatchSummary> {
        let reconciler = SerialReconciler {
            erp: self.erp.as_ref(),
            devices: device_item_numbers(),
            configuration_queues: &self.configuration_queues,
            columns: &self.columns,
        };
        self.driver.run(self.order_sheet_id, &reconciler).await?.into_result()
    }
}

struct SerialReconciler<'a> {
    erp: &'a dyn ErpRepository,
    devices: Vec<&'static str>,
    configuration_queues: &'a [String],
    columns: &'a OrderColumns,
}

#[async_trait]
impl RowReconciler for SerialReconciler<'_> {
    fn name(&self) -> &str {
        "serial_numbers"
    }

    fn key_column(&self) -> &str {
        &self.columns.ticket
    }

    fn skip_reason(&self, record: &Record) -> Option<String> {
        (record.text(&self.columns.mac_check) == MAC_CHECK_COMPLETE)
            .then(|| MAC_CHECK_COMPLETE.to_string())
    }

    async fn desired_fields(&self, key: &TicketKey, record: &Record) -> Result<Vec<DesiredField>> {
        let phones = record.text(&self.columns.equipment_type).trim() == PHONES_EQUIPMENT_TYPE;
        let scope = if phones {
            SerialScope::Devices(&self.devices)
        } else {
            SerialScope::ConfigurationQueues(self.configuration_queues)
        };

        let lines = self.erp.find_serials(key, scope).await?;
        if lines.is_empty() {
            info!(ticket = %key, "No equipment allocated");
            return Ok(Vec::new());
        }

        let serials = format_serials(&lines);
        if serials == record.text(&self.columns.serial_numbers) {
            info!(ticket = %key, "Serial(s) already entered");
            return Ok(Vec::new());
        }

        let mut fields = vec![DesiredField::new(&self.columns.serial_numbers, serials)];
        if phones && lines.iter().any(|l| !is_mac_address(&l.serial_number.trim().to_uppercase())) {
            fields.push(DesiredField::new(&self.columns.mac_check, MAC_CHECK_REQUIRED));
        }
        let status = record.text(&self.columns.status);
        if ALLOCATABLE_STATUSES.contains(&status.as_str()) {
            fields.push(DesiredField::new(&self.columns.status, ALLOCATED_STATUS));
        }
        Ok(fields)
    }
}
