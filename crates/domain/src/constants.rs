//! Application constants
//!
//! Status strings, column titles and messages shared by the jobs.

// Order sheet column titles
pub const EQUIPMENT_TICKET_COLUMN: &str = "Equipment Ticket";
pub const REQUESTED_SHIP_COLUMN: &str = "Requested Ship";
pub const STATUS_COLUMN: &str = "Status";
pub const ORIGINATOR_COLUMN: &str = "Originator";
pub const ESCALATED_ORDER_COLUMN: &str = "Escalated Order";
pub const EQUIPMENT_TYPE_COLUMN: &str = "Equipment Type";
pub const SERIAL_NUMBERS_COLUMN: &str = "Serial Number(s)";
pub const MAC_CHECK_COLUMN: &str = "MAC Check";

// ERP queues
pub const READY_TO_INVOICE_QUEUE: &str = "RDY TO INVOICE";
pub const READY_TO_INVOICE_RAW_QUEUES: [&str; 2] = ["RDY TO INVOICE", "RDY TO INV"];
pub const NO_TRACKING_QUEUES: [&str; 5] = ["RDY TO INVOICE", "RDY TO INV", "Q", "Q2", "INVOICE"];
pub const DEFAULT_CONFIGURATION_QUEUES: [&str; 5] =
    ["CONFIG LAB", "PROV CONFIG", "FORTINET CONFIG", "MOBILITY CONFIG", "VOIP CONFIG"];

// Sheet statuses
pub const SENT_TO_SHIPPING_STATUS: &str = "Sent to Shipping";
pub const ALLOCATED_STATUS: &str = "Allocated";
pub const ALLOCATABLE_STATUSES: [&str; 5] =
    ["Allocated", "Pending Allocation", "Unworked", "Equipment ON ORDER", "Pending SO"];
pub const TICKET_NOT_FOUND_STATUS: &str = "Ticket not found";
pub const DELIVERED_STATUS: &str = "Delivered";
pub const RETURNED_TO_SENDER_STATUS: &str = "Returned to sender";

// Serial job
pub const PHONES_EQUIPMENT_TYPE: &str = "Algo/ATA/Phones";
pub const MAC_CHECK_REQUIRED: &str = "CHECK MAC ADDRESSES";
pub const MAC_CHECK_COMPLETE: &str = "MAC check complete";

/// Local hour from which invoice-ready orders are marked as sent.
pub const SENT_TO_SHIPPING_HOUR: u32 = 18;

pub const READY_NO_TRACKING_MESSAGE: &str = "RDY TO INVOICE - No tracking available. This may be a \
     partial shipment. Tracking may be associated with another ticket number.";

pub const SHIPMENT_NOT_LOCATED_MESSAGE: &str = "We could not locate the shipment details for this \
     tracking number. Details are only available for shipments made within the last 120 days. \
     Please check your information.";

/// Lower-cased statuses the tracking job never revisits.
pub fn terminal_tracking_statuses() -> [String; 5] {
    [
        TICKET_NOT_FOUND_STATUS.to_lowercase(),
        DELIVERED_STATUS.to_lowercase(),
        RETURNED_TO_SENDER_STATUS.to_lowercase(),
        READY_NO_TRACKING_MESSAGE.to_lowercase(),
        SHIPMENT_NOT_LOCATED_MESSAGE.to_lowercase(),
    ]
}

// Notifications
pub const FAILURE_NOTIFICATION_SUBJECT: &str = "Automation Failure";
