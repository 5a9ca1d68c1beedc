//! # SheetSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the sheet store, ERP, helpdesk,
//!   carriers, notifications and the clock
//! - The reconciliation driver and its failure classifier
//! - The ticket data, serial number, tracking and helper-sheet jobs
//! - Job scheduling and the run failure report
//!
//! ## Architecture Principles
//! - Only depends on `sheetsync-common` and `sheetsync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod jobs;
pub mod reconcile;

// Infrastructure ports
pub mod carrier_ports;
pub mod clock;
pub mod erp_ports;
pub mod notification_ports;
pub mod sheet_ports;
pub mod ticketing_ports;

pub use carrier_ports::CarrierTracker;
pub use clock::{Clock, SystemClock};
pub use erp_ports::ErpRepository;
pub use jobs::{
    retry_policy, tracking_label, ClearHelperSheetsJob, FailureDigest, JobRunner, RunReport,
    Schedule, SerialNumberJob, SyncJob, TicketDataJob, TrackingJob, CLEAR_HELPERS_LABEL,
    SERIAL_NUMBER_LABEL, TICKET_DATA_LABEL,
};
pub use notification_ports::Notifier;
pub use reconcile::{
    BatchReport, BatchSummary, EscalationIndex, ReconciliationDriver, RecordOutcome,
    RowReconciler, SheetApiClassifier,
};
pub use sheet_ports::{SheetStore, MAX_DELETE_BATCH};
pub use ticketing_ports::TicketingApi;
