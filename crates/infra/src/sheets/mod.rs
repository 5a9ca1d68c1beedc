//! Sheet store adapters

pub mod smartsheet;

pub use smartsheet::SmartsheetClient;
