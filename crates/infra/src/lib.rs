//! # SheetSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The Smartsheet sheet store client
//! - The ConnectWise helpdesk client
//! - UPS and FedEx tracking clients
//! - The PostgreSQL ERP repository
//! - Failure notifiers
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `sheetsync-core`
//! - Contains all "impure" code (HTTP, database, filesystem)

pub mod carriers;
pub mod config;
pub mod erp;
pub mod errors;
pub mod http;
pub mod logging;
pub mod notify;
pub mod sheets;
pub mod ticketing;

// Re-export commonly used items
pub use carriers::{configured_trackers, FedExTracker, UpsTracker};
pub use erp::PostgresErpRepository;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use logging::init_logging;
pub use notify::{notifier_for, LogNotifier, WebhookNotifier};
pub use sheets::SmartsheetClient;
pub use ticketing::ConnectWiseClient;
