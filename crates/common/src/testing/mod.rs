//! Testing utilities and helpers
//!
//! - **[`sleeper`]**: a [`Sleeper`](crate::resilience::Sleeper) that records
//!   requested delays instead of waiting
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sheetsync_common::testing::RecordingSleeper;
//!
//! let sleeper = Arc::new(RecordingSleeper::new());
//! let invoker = RemoteCallInvoker::new(policy, classifier).with_sleeper(sleeper.clone());
//! // ... drive the invoker
//! assert_eq!(sleeper.recorded().len(), 4);
//! ```

pub mod sleeper;

pub use sleeper::RecordingSleeper;
