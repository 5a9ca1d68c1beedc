//! Row reconciliation: compute desired fields, diff, patch, isolate failures

pub mod classifier;
pub mod driver;
pub mod escalation;
pub mod report;

pub use classifier::SheetApiClassifier;
pub use driver::{ReconciliationDriver, RowReconciler};
pub use escalation::EscalationIndex;
pub use report::{BatchReport, BatchSummary, RecordEntry, RecordOutcome};
