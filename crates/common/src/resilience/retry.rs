//! Classification-aware retry for remote calls
//!
//! [`RemoteCallInvoker`] wraps any fallible async operation. Each failure is
//! handed to a [`FailureClassifier`] which decides whether it is a rate limit,
//! a transient server error or fatal. Retryable classes back off
//! exponentially with uniform jitter; fatal failures abort immediately. The
//! invoker never propagates the operation's error type: callers receive an
//! [`OperationOutcome`] and must inspect it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, error, warn};

use crate::error::{CommonError, CommonResult};

/// Default number of invocations before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Base delay for rate-limited calls.
pub const RATE_LIMIT_BASE_DELAY: Duration = Duration::from_secs(60);

/// Delay cap for rate-limited calls.
pub const RATE_LIMIT_MAX_DELAY: Duration = Duration::from_secs(300);

/// Base delay for transient server errors.
pub const SERVER_ERROR_BASE_DELAY: Duration = Duration::from_secs(10);

/// Delay cap for transient server errors.
pub const SERVER_ERROR_MAX_DELAY: Duration = Duration::from_secs(60);

/// Exclusive upper bound of the uniform jitter added to every delay.
pub const DEFAULT_JITTER_CEILING: Duration = Duration::from_secs(10);

/// Exponent cap so `2^attempt` never overflows.
pub const MAX_BACKOFF_EXPONENT: u32 = 30;

/// How a failed attempt should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The remote service is throttling us.
    RateLimited,
    /// The remote service returned a 5xx.
    ServerError,
    /// Anything else. Never retried.
    Fatal,
}

impl FailureClass {
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Fatal)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps an operation error onto a [`FailureClass`].
///
/// Each remote surface supplies its own mapping. Closures implement the trait
/// so tests can classify inline.
pub trait FailureClassifier<E> {
    fn classify(&self, error: &E) -> FailureClass;
}

impl<E, F> FailureClassifier<E> for F
where
    F: Fn(&E) -> FailureClass,
{
    fn classify(&self, error: &E) -> FailureClass {
        self(error)
    }
}

/// Exponential backoff: `min(max_delay, base_delay * 2^attempt)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl BackoffSchedule {
    pub const fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self { base_delay, max_delay }
    }

    /// Delay before the retry that follows the zero-based `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
        let factor = 2u32.saturating_pow(exponent);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Random delay added on top of the backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jitter {
    /// No jitter
    None,
    /// Uniform in `[0, ceiling)`
    Uniform { ceiling: Duration },
}

impl Jitter {
    pub fn ceiling(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Uniform { ceiling } => *ceiling,
        }
    }

    pub fn sample(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Uniform { ceiling } => {
                let ceiling_ms = u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX);
                if ceiling_ms == 0 {
                    return Duration::ZERO;
                }
                Duration::from_millis(rand::thread_rng().gen_range(0..ceiling_ms))
            }
        }
    }
}

/// Immutable retry configuration for one class of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub rate_limit: BackoffSchedule,
    pub server_error: BackoffSchedule,
    pub jitter: Jitter,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            rate_limit: BackoffSchedule::new(RATE_LIMIT_BASE_DELAY, RATE_LIMIT_MAX_DELAY),
            server_error: BackoffSchedule::new(SERVER_ERROR_BASE_DELAY, SERVER_ERROR_MAX_DELAY),
            jitter: Jitter::Uniform { ceiling: DEFAULT_JITTER_CEILING },
        }
    }
}

impl RetryPolicy {
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Backoff schedule for a class, `None` for classes that never retry.
    pub fn schedule_for(&self, class: FailureClass) -> Option<&BackoffSchedule> {
        match class {
            FailureClass::RateLimited => Some(&self.rate_limit),
            FailureClass::ServerError => Some(&self.server_error),
            FailureClass::Fatal => None,
        }
    }

    /// Upper bound of any single delay this policy can produce.
    pub fn delay_ceiling(&self) -> Duration {
        self.rate_limit.max_delay.max(self.server_error.max_delay) + self.jitter.ceiling()
    }

    pub fn validate(&self) -> CommonResult<()> {
        if self.max_attempts == 0 {
            return Err(CommonError::config_field("max_attempts", "must be at least 1"));
        }
        for (field, schedule) in [("rate_limit", &self.rate_limit), ("server_error", &self.server_error)]
        {
            if schedule.base_delay > schedule.max_delay {
                return Err(CommonError::config_field(
                    field,
                    format!(
                        "base delay {:?} exceeds max delay {:?}",
                        schedule.base_delay, schedule.max_delay
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.policy.max_attempts = attempts;
        self
    }

    pub fn rate_limit_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.policy.rate_limit = BackoffSchedule::new(base_delay, max_delay);
        self
    }

    pub fn server_error_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.policy.server_error = BackoffSchedule::new(base_delay, max_delay);
        self
    }

    pub fn jitter_ceiling(mut self, ceiling: Duration) -> Self {
        self.policy.jitter = Jitter::Uniform { ceiling };
        self
    }

    pub fn no_jitter(mut self) -> Self {
        self.policy.jitter = Jitter::None;
        self
    }

    pub fn build(self) -> CommonResult<RetryPolicy> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}

/// Why an invocation produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// Every attempt failed with a retryable error.
    ExhaustedRetries { attempts: u32, last_error: String },
    /// An attempt failed with an error that must not be retried.
    NonRetryable { attempts: u32, error: String },
}

impl CallFailure {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::ExhaustedRetries { attempts, .. } | Self::NonRetryable { attempts, .. } => {
                *attempts
            }
        }
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExhaustedRetries { attempts, last_error } => write!(
                f,
                "max retry attempts reached after {} attempts: {}",
                attempts, last_error
            ),
            Self::NonRetryable { attempts, error } => {
                write!(f, "non-retryable error on attempt {}: {}", attempts, error)
            }
        }
    }
}

impl std::error::Error for CallFailure {}

/// Result of [`RemoteCallInvoker::invoke`]
#[derive(Debug)]
#[must_use]
pub enum OperationOutcome<T> {
    Success { value: T, attempts: u32 },
    Failed(CallFailure),
}

impl<T> OperationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } => *attempts,
            Self::Failed(failure) => failure.attempts(),
        }
    }

    pub fn failure(&self) -> Option<&CallFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Drop the failure detail, keeping only the value.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, CallFailure> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Suspends the invoker between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Production sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Executes remote operations under a [`RetryPolicy`].
///
/// ```rust,ignore
/// let invoker = RemoteCallInvoker::new(RetryPolicy::default(), classifier);
/// let outcome = invoker.invoke("update_rows", || store.update_rows(id, &rows)).await;
/// if let OperationOutcome::Failed(failure) = outcome {
///     warn!(%failure, "row update skipped");
/// }
/// ```
pub struct RemoteCallInvoker<C> {
    policy: RetryPolicy,
    classifier: C,
    sleeper: Arc<dyn Sleeper>,
}

impl<C> fmt::Debug for RemoteCallInvoker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCallInvoker").field("policy", &self.policy).finish_non_exhaustive()
    }
}

impl<C> RemoteCallInvoker<C> {
    pub fn new(policy: RetryPolicy, classifier: C) -> Self {
        Self { policy, classifier, sleeper: Arc::new(TokioSleeper) }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, fails fatally or runs out of
    /// attempts.
    ///
    /// The operation is invoked at most `max_attempts` times. Delays within
    /// one invocation never decrease. No sleep follows the final attempt.
    pub async fn invoke<F, Fut, T, E>(&self, operation_name: &str, mut operation: F) -> OperationOutcome<T>
    where
        C: FailureClassifier<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut previous_delay = Duration::ZERO;
        let mut attempt: u32 = 0;

        loop {
            let attempts = attempt + 1;
            let error = match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation = operation_name, attempts, "Operation succeeded after retry");
                    }
                    return OperationOutcome::Success { value, attempts };
                }
                Err(error) => error,
            };

            let class = self.classifier.classify(&error);
            let Some(schedule) = self.policy.schedule_for(class) else {
                error!(
                    operation = operation_name,
                    attempts,
                    error = %error,
                    "Non-retryable error, aborting"
                );
                return OperationOutcome::Failed(CallFailure::NonRetryable {
                    attempts,
                    error: error.to_string(),
                });
            };

            if attempts >= max_attempts {
                warn!(
                    operation = operation_name,
                    attempts,
                    class = %class,
                    error = %error,
                    "Max retry attempts reached"
                );
                return OperationOutcome::Failed(CallFailure::ExhaustedRetries {
                    attempts,
                    last_error: error.to_string(),
                });
            }

            let delay = (schedule.delay_for(attempt) + self.policy.jitter.sample()).max(previous_delay);
            previous_delay = delay;

            warn!(
                operation = operation_name,
                attempt = attempts,
                max_attempts,
                class = %class,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Retryable error, backing off"
            );

            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}
