//! Integration tests for the resilience module
//!
//! Drives `RemoteCallInvoker` through mixed failure sequences using the
//! recording sleeper so no real time passes.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sheetsync_common::resilience::{
    CallFailure, FailureClass, OperationOutcome, RemoteCallInvoker, RetryPolicy,
};
use sheetsync_common::testing::RecordingSleeper;

#[derive(Debug, Clone, Copy)]
enum Failure {
    Throttled,
    Gateway,
    Rejected,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Throttled => write!(f, "errorCode 4003"),
            Self::Gateway => write!(f, "502 Bad Gateway"),
            Self::Rejected => write!(f, "errorCode 1006: Not Found"),
        }
    }
}

fn classify(failure: &Failure) -> FailureClass {
    match failure {
        Failure::Throttled => FailureClass::RateLimited,
        Failure::Gateway => FailureClass::ServerError,
        Failure::Rejected => FailureClass::Fatal,
    }
}

/// Validates a throttle followed by a fatal error stops at the fatal one.
///
/// # Test Steps
/// 1. First call is rate limited, second is rejected
/// 2. Verify exactly two invocations and one sleep
/// 3. Confirm the outcome is `NonRetryable` naming the second attempt
#[tokio::test]
async fn test_throttle_then_fatal_stops_immediately() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let invoker = RemoteCallInvoker::new(RetryPolicy::default(), classify as fn(&Failure) -> FailureClass)
        .with_sleeper(sleeper.clone());
    let script = [Failure::Throttled, Failure::Rejected];
    let calls = AtomicU32::new(0);

    let outcome = invoker
        .invoke("update_rows", || {
            let index = calls.fetch_add(1, Ordering::SeqCst) as usize;
            let failure = script[index.min(script.len() - 1)];
            async move { Err::<(), _>(failure) }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(sleeper.recorded().len(), 1);
    assert!(sleeper.recorded()[0] >= Duration::from_secs(60));
    match outcome {
        OperationOutcome::Failed(CallFailure::NonRetryable { attempts, error }) => {
            assert_eq!(attempts, 2);
            assert_eq!(error, "errorCode 1006: Not Found");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

/// Validates delays stay non-decreasing when classes change mid-sequence.
///
/// # Test Steps
/// 1. Rate limit (60s+ delay) followed by server errors (10s base)
/// 2. Verify later server-error delays never drop below the first delay
#[tokio::test]
async fn test_mixed_classes_keep_delays_monotonic() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let invoker = RemoteCallInvoker::new(RetryPolicy::default(), classify as fn(&Failure) -> FailureClass)
        .with_sleeper(sleeper.clone());
    let calls = AtomicU32::new(0);

    let outcome = invoker
        .invoke("fetch_sheet", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            let failure = if n == 0 { Failure::Throttled } else { Failure::Gateway };
            async move { Err::<(), _>(failure) }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert!(matches!(outcome.failure(), Some(CallFailure::ExhaustedRetries { attempts: 5, .. })));
    let delays = sleeper.recorded();
    for pair in delays.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    let ceiling = RetryPolicy::default().delay_ceiling();
    assert!(delays.iter().all(|d| *d < ceiling));
}

#[tokio::test]
async fn test_single_attempt_policy_never_sleeps() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let policy = RetryPolicy::builder().max_attempts(1).build().unwrap();
    let invoker = RemoteCallInvoker::new(policy, classify as fn(&Failure) -> FailureClass)
        .with_sleeper(sleeper.clone());

    let outcome = invoker.invoke("fetch_sheet", || async { Err::<(), _>(Failure::Gateway) }).await;

    assert_eq!(outcome.attempts(), 1);
    assert!(sleeper.recorded().is_empty());
}
