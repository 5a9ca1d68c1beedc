//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use sheetsync_common::error::{ErrorClassification, ErrorSeverity};
use thiserror::Error;

/// Sheet API error code returned when requests are being throttled.
pub const RATE_LIMIT_ERROR_CODE: u32 = 4003;

/// Main error type for SheetSync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SheetSyncError {
    #[error("{}", render_api_error(.service, .status, .code, .message))]
    Api { service: String, status: Option<u16>, code: Option<u32>, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Batch(BatchFailure),
}

/// Result type alias for SheetSync operations
pub type Result<T> = std::result::Result<T, SheetSyncError>;

fn render_api_error(
    service: &str,
    status: &Option<u16>,
    code: &Option<u32>,
    message: &str,
) -> String {
    match (status, code) {
        (Some(status), Some(code)) => {
            format!("{service} API error (HTTP {status}, code {code}): {message}")
        }
        (Some(status), None) => format!("{service} API error (HTTP {status}): {message}"),
        (None, Some(code)) => format!("{service} API error (code {code}): {message}"),
        (None, None) => format!("{service} API error: {message}"),
    }
}

impl SheetSyncError {
    pub fn api(
        service: impl Into<String>,
        status: Option<u16>,
        code: Option<u32>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api { service: service.into(), status, code, message: message.into() }
    }

    /// True for the sheet API's throttling error code.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { code: Some(RATE_LIMIT_ERROR_CODE), .. })
    }

    /// True for API errors carrying an HTTP 5xx status.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status: Some(500..=599), .. })
    }
}

impl ErrorClassification for SheetSyncError {
    fn is_retryable(&self) -> bool {
        self.is_rate_limited() || self.is_server_error()
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            _ if self.is_rate_limited() => ErrorSeverity::Warning,
            Self::NotFound(_) => ErrorSeverity::Info,
            Self::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

/// One record that could not be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub key: String,
    pub error: String,
}

impl RecordFailure {
    pub fn new(key: impl Into<String>, error: impl ToString) -> Self {
        Self { key: key.into(), error: error.to_string() }
    }
}

impl std::fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ticket: {} - {}", self.key, self.error)
    }
}

/// Aggregate failure raised once at the end of a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Errors occurred in {} record(s):\n{}", .failures.len(), render_failures(.failures))]
pub struct BatchFailure {
    pub failures: Vec<RecordFailure>,
}

fn render_failures(failures: &[RecordFailure]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

impl BatchFailure {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.key.as_str())
    }
}

impl From<BatchFailure> for SheetSyncError {
    fn from(failure: BatchFailure) -> Self {
        Self::Batch(failure)
    }
}
