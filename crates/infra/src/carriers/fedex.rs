use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use sheetsync_core::CarrierTracker;
use sheetsync_domain::{
    Carrier, CarrierApiConfig, Result, SheetSyncError, TicketKey, TrackingReport,
};
use tracing::debug;

use super::oauth::{ClientCredentialsToken, CredentialStyle};
use super::{format_estimate, is_lookup_miss};
use crate::errors::InfraError;
use crate::http::HttpClient;

const SERVICE: &str = "fedex";

const RESULT_POINTER: &str = "/output/completeTrackResults/0/trackResults/0";

pub struct FedExTracker {
    http: HttpClient,
    api_base_url: String,
    token: ClientCredentialsToken,
}

impl FedExTracker {
    pub fn new(http: HttpClient, config: &CarrierApiConfig) -> Self {
        Self {
            token: ClientCredentialsToken::new(
                SERVICE,
                http.clone(),
                config,
                CredentialStyle::FormBody,
            ),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

/// `"2024-03-12T17:00:00-06:00"` → `"March 12, 2024 by 17:00"`; midnight is
/// rendered as `EOD`.
fn estimate_from_timestamp(raw: &str) -> Option<String> {
    let (date, time) = raw.trim().split_once('T')?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let hhmm = time.get(..5)?;
    let by = if hhmm == "00:00" { "EOD" } else { hhmm };
    Some(format_estimate(date, by))
}

/// Build a report from a FedEx track-by-number payload.
///
/// Delivery dates are not reported. A missing status yields an empty one.
pub(crate) fn parse_report(payload: &Value) -> TrackingReport {
    let result = payload.pointer(RESULT_POINTER);
    let status = result
        .and_then(|r| r.pointer("/latestStatusDetail/description"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let estimated_delivery = result
        .and_then(|r| r.pointer("/dateAndTimes/0/dateTime"))
        .and_then(Value::as_str)
        .and_then(estimate_from_timestamp);

    TrackingReport { status, delivery_date: None, estimated_delivery }
}

#[async_trait]
impl CarrierTracker for FedExTracker {
    fn carrier(&self) -> Carrier {
        Carrier::FedEx
    }

    async fn track(&self, tracking_number: &str, reference: &TicketKey) -> Result<TrackingReport> {
        let token = self.token.access_token().await?;
        let body = json!({
            "trackingInfo": [{"trackingNumberInfo": {"trackingNumber": tracking_number}}],
            "includeDetailedScans": false
        });
        let builder = self
            .http
            .request(Method::POST, format!("{}/track/v1/trackingnumbers", self.api_base_url))
            .bearer_auth(token)
            .header("x-customer-transaction-id", reference.as_str())
            .header("X-locale", "en_US")
            .json(&body);

        let response = self.http.send(builder).await?;
        let status = response.status();
        if is_lookup_miss(status) {
            debug!(tracking_number, status = status.as_u16(), "FedEx has no record of shipment");
            return Ok(TrackingReport::default());
        }
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetSyncError::api(SERVICE, Some(status.as_u16()), None, body));
        }

        let payload: Value =
            response.json().await.map_err(|e| SheetSyncError::from(InfraError::from(e)))?;
        Ok(parse_report(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(status: &str, date_time: &str) -> Value {
        json!({
            "output": {"completeTrackResults": [{"trackResults": [{
                "latestStatusDetail": {"code": "DL", "description": status},
                "dateAndTimes": [{"type": "ACTUAL_DELIVERY", "dateTime": date_time}]
            }]}]}
        })
    }

    #[test]
    fn test_parse_delivered_with_time() {
        let report = parse_report(&payload("Delivered", "2024-03-12T17:05:00-06:00"));
        assert_eq!(report.status, "Delivered");
        assert_eq!(report.delivery_date, None);
        assert_eq!(report.estimated_delivery.as_deref(), Some("March 12, 2024 by 17:05"));
    }

    #[test]
    fn test_midnight_is_end_of_day() {
        let report = parse_report(&payload("In transit", "2024-03-14T00:00:00-06:00"));
        assert_eq!(report.estimated_delivery.as_deref(), Some("March 14, 2024 by EOD"));
    }

    #[test]
    fn test_missing_fields_yield_empty_status() {
        let report = parse_report(&json!({"output": {}}));
        assert_eq!(report, TrackingReport::default());
    }
}
