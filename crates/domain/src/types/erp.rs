//! Rows returned by the ERP order database

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{READY_TO_INVOICE_QUEUE, READY_TO_INVOICE_RAW_QUEUES};

/// Map raw batch names onto the queue names the jobs compare against.
///
/// `RDY TO INV` and any batch starting with `Q` are invoice-ready.
pub fn normalize_queue(raw: &str) -> String {
    let queue = raw.trim();
    if READY_TO_INVOICE_RAW_QUEUES.iter().any(|q| q.eq_ignore_ascii_case(queue))
        || queue.starts_with('Q')
        || queue.starts_with('q')
    {
        READY_TO_INVOICE_QUEUE.to_string()
    } else {
        queue.to_string()
    }
}

/// Header-level view of a sales order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_number: String,
    pub queue: String,
    pub requested_ship_date: Option<NaiveDate>,
    pub customer_po: Option<String>,
    pub created_by: Option<String>,
}

impl OrderSnapshot {
    pub fn is_ready_to_invoice(&self) -> bool {
        self.queue == READY_TO_INVOICE_QUEUE
    }
}

/// One serialized item allocated to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialLine {
    pub item_number: String,
    pub serial_number: String,
}

/// Which serial lines a lookup should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialScope<'a> {
    /// Only items in the given device catalog.
    Devices(&'a [&'a str]),
    /// Items allocated in the configuration queues.
    ConfigurationQueues(&'a [String]),
}

/// Shipping view of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub order_number: String,
    pub queue: String,
    pub tracking_number: Option<String>,
}

impl ShipmentRecord {
    /// Tracking number upper-cased and trimmed, `None` when blank.
    pub fn tracking(&self) -> Option<String> {
        self.tracking_number
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
    }
}
