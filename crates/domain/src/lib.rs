//! # SheetSync Domain
//!
//! Business domain types for the sheet reconciliation jobs.
//!
//! This crate contains:
//! - Ticket key normalization and escalation ticket extraction
//! - Sheet snapshot types, typed field values and patches
//! - Carrier classification for tracking numbers
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - Depends only on the foundation tier of `sheetsync-common`
//! - Pure domain models and data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
