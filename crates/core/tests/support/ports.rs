//! Mock ERP, ticketing, carrier, notifier and clock ports

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sheetsync_core::{CarrierTracker, Clock, ErpRepository, Notifier, TicketingApi};
use sheetsync_domain::{
    Carrier, Notification, OrderSnapshot, Result, SerialLine, SerialScope, SheetSyncError,
    ShipmentRecord, TicketDetails, TicketKey, TrackingReport,
};

/// ERP seeded per ticket key. Keys in `failing` return a database error
/// from every lookup.
#[derive(Default)]
pub struct MockErp {
    pub orders: HashMap<String, OrderSnapshot>,
    pub device_serials: HashMap<String, Vec<SerialLine>>,
    pub queue_serials: HashMap<String, Vec<SerialLine>>,
    pub shipments: HashMap<String, ShipmentRecord>,
    pub owners: HashMap<String, String>,
    pub failing: HashSet<String>,
    pub owner_lookup_fails: bool,
    scopes: Mutex<Vec<String>>,
}

impl MockErp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, key: &str, order: OrderSnapshot) -> Self {
        self.orders.insert(key.to_string(), order);
        self
    }

    pub fn with_device_serials(mut self, key: &str, lines: Vec<SerialLine>) -> Self {
        self.device_serials.insert(key.to_string(), lines);
        self
    }

    pub fn with_queue_serials(mut self, key: &str, lines: Vec<SerialLine>) -> Self {
        self.queue_serials.insert(key.to_string(), lines);
        self
    }

    pub fn with_shipment(mut self, key: &str, queue: &str, tracking: Option<&str>) -> Self {
        self.shipments.insert(
            key.to_string(),
            ShipmentRecord {
                order_number: key.to_string(),
                queue: queue.to_string(),
                tracking_number: tracking.map(str::to_string),
            },
        );
        self
    }

    pub fn with_owner(mut self, key: &str, owner: &str) -> Self {
        self.owners.insert(key.to_string(), owner.to_string());
        self
    }

    pub fn failing_for(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// `"devices"` or `"queues"` per serial lookup, in call order.
    pub fn serial_scopes(&self) -> Vec<String> {
        self.scopes.lock().clone()
    }

    fn check(&self, key: &TicketKey) -> Result<()> {
        if self.failing.contains(key.as_str()) {
            return Err(SheetSyncError::Database(format!("lookup failed for {key}")));
        }
        Ok(())
    }
}

pub fn order(number: &str, queue: &str, ship: Option<&str>) -> OrderSnapshot {
    OrderSnapshot {
        order_number: number.to_string(),
        queue: queue.to_string(),
        requested_ship_date: ship.map(|d| d.parse().expect("test date")),
        customer_po: None,
        created_by: None,
    }
}

pub fn serial(item: &str, serial: &str) -> SerialLine {
    SerialLine { item_number: item.to_string(), serial_number: serial.to_string() }
}

#[async_trait]
impl ErpRepository for MockErp {
    async fn find_order(&self, key: &TicketKey) -> Result<Option<OrderSnapshot>> {
        self.check(key)?;
        Ok(self.orders.get(key.as_str()).cloned())
    }

    async fn find_serials(
        &self,
        key: &TicketKey,
        scope: SerialScope<'_>,
    ) -> Result<Vec<SerialLine>> {
        self.check(key)?;
        let source = match scope {
            SerialScope::Devices(_) => {
                self.scopes.lock().push("devices".to_string());
                &self.device_serials
            }
            SerialScope::ConfigurationQueues(_) => {
                self.scopes.lock().push("queues".to_string());
                &self.queue_serials
            }
        };
        Ok(source.get(key.as_str()).cloned().unwrap_or_default())
    }

    async fn find_shipment(&self, key: &TicketKey) -> Result<Option<ShipmentRecord>> {
        self.check(key)?;
        Ok(self.shipments.get(key.as_str()).cloned())
    }

    async fn find_ticket_owner(&self, key: &TicketKey) -> Result<Option<String>> {
        if self.owner_lookup_fails {
            return Err(SheetSyncError::Database("owner view unavailable".into()));
        }
        Ok(self.owners.get(key.as_str()).cloned())
    }
}

#[derive(Default)]
pub struct MockTicketing {
    pub tickets: HashMap<String, TicketDetails>,
}

impl MockTicketing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entered_by(mut self, key: &str, entered_by: &str) -> Self {
        self.tickets.insert(
            key.to_string(),
            TicketDetails {
                id: key.parse().unwrap_or_default(),
                summary: "Equipment order".into(),
                status: None,
                company: None,
                entered_by: Some(entered_by.to_string()),
            },
        );
        self
    }
}

#[async_trait]
impl TicketingApi for MockTicketing {
    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<TicketDetails>> {
        Ok(self.tickets.get(ticket_id).cloned())
    }
}

/// Tracker answering from a fixed table; unknown numbers are not located.
pub struct MockTracker {
    carrier: Carrier,
    reports: HashMap<String, TrackingReport>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockTracker {
    pub fn new(carrier: Carrier) -> Self {
        Self { carrier, reports: HashMap::new(), calls: Mutex::new(Vec::new()) }
    }

    pub fn with_report(mut self, tracking: &str, report: TrackingReport) -> Self {
        self.reports.insert(tracking.to_string(), report);
        self
    }

    /// `(tracking number, reference)` pairs seen so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CarrierTracker for MockTracker {
    fn carrier(&self) -> Carrier {
        self.carrier
    }

    async fn track(&self, tracking_number: &str, reference: &TicketKey) -> Result<TrackingReport> {
        self.calls.lock().push((tracking_number.to_string(), reference.to_string()));
        Ok(self.reports.get(tracking_number).cloned().unwrap_or_else(TrackingReport::not_located))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        if self.fail {
            return Err(SheetSyncError::Notification("relay refused".into()));
        }
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
