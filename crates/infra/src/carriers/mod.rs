//! Shipping carrier tracking adapters

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::StatusCode;
use sheetsync_core::CarrierTracker;
use sheetsync_domain::CarriersConfig;

use crate::http::HttpClient;

pub mod fedex;
pub mod oauth;
pub mod ups;

pub use fedex::FedExTracker;
pub use oauth::{ClientCredentialsToken, CredentialStyle};
pub use ups::UpsTracker;

/// `"March 12, 2024 by AM"`
pub(crate) fn format_estimate(date: NaiveDate, by: &str) -> String {
    format!("{} by {by}", date.format("%B %-d, %Y"))
}

/// Statuses meaning the carrier does not know the tracking number.
pub(crate) fn is_lookup_miss(status: StatusCode) -> bool {
    matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND)
}

/// Trackers for every carrier with credentials configured.
pub fn configured_trackers(
    config: &CarriersConfig,
    http: &HttpClient,
) -> Vec<Arc<dyn CarrierTracker>> {
    let mut trackers: Vec<Arc<dyn CarrierTracker>> = Vec::new();
    if let Some(ups) = &config.ups {
        trackers.push(Arc::new(UpsTracker::new(http.clone(), ups)));
    }
    if let Some(fedex) = &config.fedex {
        trackers.push(Arc::new(FedExTracker::new(http.clone(), fedex)));
    }
    trackers
}
