//! Common error types and classification shared across SheetSync crates.
//!
//! The error handling system is built on three pieces:
//!
//! 1. **`CommonError`**: errors raised by the shared building blocks themselves
//!    (today, invalid resilience settings).
//! 2. **`ErrorClassification`**: a standard interface for asking an error
//!    whether it is retryable and how severe it is.
//! 3. **`ErrorSeverity`**: a single severity scale used when logging.
//!
//! Module-specific errors implement `ErrorClassification` so retry and
//! reporting code can treat them uniformly.
//!
//! ```rust,ignore
//! use sheetsync_common::error::{CommonError, CommonResult};
//!
//! fn check_attempts(max_attempts: u32) -> CommonResult<()> {
//!     if max_attempts == 0 {
//!         return Err(CommonError::config_field("max_attempts", "must be at least 1"));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised by the shared building blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A setting was rejected
    Config { field: String, message: String },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { field, message } => {
                write!(f, "Configuration error in field '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl CommonError {
    /// Create a configuration error for a specific field
    pub fn config_field<S: Into<String>, F: Into<String>>(field: F, message: S) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }
}

/// Error classification trait for consistent error handling across modules
///
/// Retry code and the job runner use this to decide whether an error is
/// worth another attempt and how loudly to log it.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: rate limiting, temporary service
    /// unavailability.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
