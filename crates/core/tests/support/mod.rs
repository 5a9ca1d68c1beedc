//! Shared test helpers for `sheetsync-core` integration tests.
//!
//! In-memory implementations of every core port plus a small sheet builder,
//! so job tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod ports;
pub mod sheets;

use std::sync::Arc;
use std::time::Duration;

use sheetsync_common::resilience::RetryPolicy;
use sheetsync_common::testing::RecordingSleeper;
use sheetsync_core::ReconciliationDriver;

pub use ports::{FixedClock, MockErp, MockTicketing, MockTracker, RecordingNotifier};
pub use sheets::{InMemorySheetStore, SheetBuilder};

/// Retry policy with short, jitter-free delays.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::builder()
        .max_attempts(3)
        .rate_limit_backoff(Duration::from_millis(10), Duration::from_millis(40))
        .server_error_backoff(Duration::from_millis(5), Duration::from_millis(20))
        .no_jitter()
        .build()
        .expect("test policy should be valid")
}

/// Driver over `store` that records backoff instead of sleeping.
pub fn driver(store: Arc<InMemorySheetStore>) -> (Arc<ReconciliationDriver>, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::new());
    let driver = ReconciliationDriver::new(store, fast_policy()).with_sleeper(sleeper.clone());
    (Arc::new(driver), sleeper)
}
