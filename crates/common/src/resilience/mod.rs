//! Resilience patterns for remote calls
//!
//! - **Retry**: classification-aware retry with exponential backoff and
//!   uniform jitter ([`retry::RemoteCallInvoker`])
//!
//! The module is generic over the operation's error type. Each remote surface
//! plugs in its own [`FailureClassifier`] so the same invoker can guard sheet
//! writes, carrier lookups or anything else that talks to the network.

pub mod retry;

pub use retry::{
    BackoffSchedule, CallFailure, FailureClass, FailureClassifier, Jitter, OperationOutcome,
    RemoteCallInvoker, RetryPolicy, RetryPolicyBuilder, Sleeper, TokioSleeper,
    DEFAULT_JITTER_CEILING, DEFAULT_MAX_ATTEMPTS, MAX_BACKOFF_EXPONENT, RATE_LIMIT_BASE_DELAY,
    RATE_LIMIT_MAX_DELAY, SERVER_ERROR_BASE_DELAY, SERVER_ERROR_MAX_DELAY,
};
