//! Domain types and models

pub mod carrier;
pub mod erp;
pub mod notification;
pub mod record;
pub mod sheet;
pub mod ticket;
pub mod ticketing;
pub mod tracking;
pub mod value;

pub use carrier::Carrier;
pub use erp::{normalize_queue, OrderSnapshot, SerialLine, SerialScope, ShipmentRecord};
pub use notification::Notification;
pub use record::{DesiredField, FieldPatch, Record};
pub use sheet::{Cell, CellUpdate, Column, ColumnMap, Row, RowUpdate, Sheet};
pub use ticket::{extract_ticket_numbers, normalize_ticket_number, TicketKey};
pub use ticketing::TicketDetails;
pub use tracking::TrackingReport;
pub use value::{CellValue, FieldValue};
