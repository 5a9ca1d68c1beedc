//! # SheetSync App
//!
//! Binary layer: wires configuration, adapters and jobs together for one
//! scheduled run.
//!
//! This crate contains:
//! - The job plan for a point in time
//! - Application context (dependency injection)
//! - The run entry point used by `main`
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod plan;

pub use context::{run, Adapters, AppContext};
pub use plan::JobPlan;
