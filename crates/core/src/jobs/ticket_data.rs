//! Order sheet ticket data: requested ship date, shipping status,
//! originator and the escalation flag

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Timelike;
use chrono_tz::Tz;
use sheetsync_domain::constants::{SENT_TO_SHIPPING_HOUR, SENT_TO_SHIPPING_STATUS};
use sheetsync_domain::{DesiredField, FieldValue, OrderColumns, Record, Result, TicketKey};
use tracing::{debug, warn};

use super::SyncJob;
use crate::clock::Clock;
use crate::erp_ports::ErpRepository;
use crate::reconcile::{BatchSummary, EscalationIndex, ReconciliationDriver, RowReconciler};
use crate::ticketing_ports::TicketingApi;

pub const TICKET_DATA_LABEL: &str = "Ticket Data Automation Failure";

pub struct TicketDataJob {
    driver: Arc<ReconciliationDriver>,
    erp: Arc<dyn ErpRepository>,
    ticketing: Arc<dyn TicketingApi>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    order_sheet_id: u64,
    escalation_sheet_id: u64,
    escalation_ticket_column: String,
    columns: OrderColumns,
}

impl TicketDataJob {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        driver: Arc<ReconciliationDriver>,
        erp: Arc<dyn ErpRepository>,
        ticketing: Arc<dyn TicketingApi>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        order_sheet_id: u64,
        escalation_sheet_id: u64,
        escalation_ticket_column: impl Into<String>,
        columns: OrderColumns,
    ) -> Self {
        Self {
            driver,
            erp,
            ticketing,
            clock,
            timezone,
            order_sheet_id,
            escalation_sheet_id,
            escalation_ticket_column: escalation_ticket_column.into(),
            columns,
        }
    }

    async fn escalation_index(&self) -> Result<EscalationIndex> {
        let sheet = self.driver.fetch_sheet(self.escalation_sheet_id).await?;
        let index = EscalationIndex::from_sheet(&sheet, &self.escalation_ticket_column);
        debug!(sheet_id = sheet.id, tickets = index.len(), "Loaded escalation tickets");
        Ok(index)
    }
}

#[async_trait]
impl SyncJob for TicketDataJob {
    fn label(&self) -> &str {
        TICKET_DATA_LABEL
    }

    async fn run(&self) -> Result<BatchSummary> {
        let escalations = self.escalation_index().await?;
        let reconciler = TicketDataReconciler {
            erp: self.erp.as_ref(),
            ticketing: self.ticketing.as_ref(),
            local_hour: self.clock.now().with_timezone(&self.timezone).hour(),
            escalations: &escalations,
            columns: &self.columns,
        };
        self.driver.run(self.order_sheet_id, &reconciler).await?.into_result()
    }
}

struct TicketDataReconciler<'a> {
    erp: &'a dyn ErpRepository,
    ticketing: &'a dyn TicketingApi,
    local_hour: u32,
    escalations: &'a EscalationIndex,
    columns: &'a OrderColumns,
}

impl TicketDataReconciler<'_> {
    /// ERP owner first, then whoever entered the helpdesk ticket.
    async fn resolve_originator(&self, key: &TicketKey) -> Option<String> {
        match self.erp.find_ticket_owner(key).await {
            Ok(Some(owner)) if !owner.trim().is_empty() => return Some(owner.trim().to_string()),
            Ok(_) => {}
            Err(e) => warn!(ticket = %key, error = %e, "ERP owner lookup failed"),
        }

        match self.ticketing.get_ticket(key.as_str()).await {
            Ok(ticket) => ticket
                .and_then(|t| t.entered_by)
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            Err(e) => {
                warn!(ticket = %key, error = %e, "Ticket lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl RowReconciler for TicketDataReconciler<'_> {
    fn name(&self) -> &str {
        "ticket_data"
    }

    fn key_column(&self) -> &str {
        &self.columns.ticket
    }

    async fn desired_fields(&self, key: &TicketKey, record: &Record) -> Result<Vec<DesiredField>> {
        let mut fields = Vec::new();

        if let Some(order) = self.erp.find_order(key).await? {
            if let Some(date) = order.requested_ship_date {
                fields.push(DesiredField::new(
                    &self.columns.requested_ship,
                    date.format("%Y-%m-%d").to_string(),
                ));
            }
            if order.is_ready_to_invoice() && self.local_hour >= SENT_TO_SHIPPING_HOUR {
                fields.push(DesiredField::new(&self.columns.status, SENT_TO_SHIPPING_STATUS));
            }
        } else {
            debug!(ticket = %key, "Order not found in ERP");
        }

        let originator = record.text(&self.columns.originator);
        let originator = originator.trim();
        if originator.is_empty() || originator.eq_ignore_ascii_case("none") {
            if let Some(owner) = self.resolve_originator(key).await {
                fields.push(DesiredField::new(&self.columns.originator, owner));
            }
        }

        if self.escalations.contains(key) {
            fields.push(DesiredField::new(&self.columns.escalated, FieldValue::number(1)));
        }

        Ok(fields)
    }
}
