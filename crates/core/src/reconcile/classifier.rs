use sheetsync_common::error::ErrorClassification;
use sheetsync_common::resilience::{FailureClass, FailureClassifier};
use sheetsync_domain::SheetSyncError;

/// Sheet API failure mapping: error code 4003 is a rate limit, HTTP 5xx is
/// transient, everything else is fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetApiClassifier;

impl FailureClassifier<SheetSyncError> for SheetApiClassifier {
    fn classify(&self, error: &SheetSyncError) -> FailureClass {
        if !error.is_retryable() {
            FailureClass::Fatal
        } else if error.is_rate_limited() {
            FailureClass::RateLimited
        } else {
            FailureClass::ServerError
        }
    }
}
