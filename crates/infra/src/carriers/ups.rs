use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use sheetsync_core::CarrierTracker;
use sheetsync_domain::{
    Carrier, CarrierApiConfig, Result, SheetSyncError, TicketKey, TrackingReport,
};
use tracing::debug;

use super::oauth::{ClientCredentialsToken, CredentialStyle};
use super::{format_estimate, is_lookup_miss};
use crate::errors::InfraError;
use crate::http::HttpClient;

const SERVICE: &str = "ups";
const TRANSACTION_SOURCE: &str = "sheetsync";

pub const DELIVERY_DATE_PENDING: &str = "The delivery date will be provided as soon as possible.";

const STATUS_POINTER: &str = "/trackResponse/shipment/0/package/0/activity/0/status/description";
const DATE_POINTER: &str = "/trackResponse/shipment/0/package/0/deliveryDate/0/date";
const TIME_TYPE_POINTER: &str = "/trackResponse/shipment/0/package/0/deliveryTime/type";

pub struct UpsTracker {
    http: HttpClient,
    api_base_url: String,
    token: ClientCredentialsToken,
}

impl UpsTracker {
    pub fn new(http: HttpClient, config: &CarrierApiConfig) -> Self {
        Self {
            token: ClientCredentialsToken::new(
                SERVICE,
                http.clone(),
                config,
                CredentialStyle::BasicAuth,
            ),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

/// Build a report from a UPS track details payload.
pub(crate) fn parse_report(payload: &Value) -> TrackingReport {
    let Some(status) = payload.pointer(STATUS_POINTER).and_then(Value::as_str) else {
        return TrackingReport::not_located();
    };

    let delivery_date = payload
        .pointer(DATE_POINTER)
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y%m%d").ok());
    let time_type = payload.pointer(TIME_TYPE_POINTER).and_then(Value::as_str).map(|t| {
        match t.trim() {
            "CMT" => "AM",
            other => other,
        }
    });

    let estimated_delivery = match (delivery_date, time_type) {
        (Some(date), Some(by)) if !by.is_empty() => format_estimate(date, by),
        _ => DELIVERY_DATE_PENDING.to_string(),
    };

    TrackingReport {
        status: status.trim().to_string(),
        delivery_date,
        estimated_delivery: Some(estimated_delivery),
    }
}

#[async_trait]
impl CarrierTracker for UpsTracker {
    fn carrier(&self) -> Carrier {
        Carrier::Ups
    }

    async fn track(&self, tracking_number: &str, reference: &TicketKey) -> Result<TrackingReport> {
        let token = self.token.access_token().await?;
        let url = format!("{}/api/track/v1/details/{tracking_number}", self.api_base_url);
        let builder = self
            .http
            .request(Method::GET, url)
            .bearer_auth(token)
            .header("transId", reference.as_str())
            .header("transactionSrc", TRANSACTION_SOURCE)
            .query(&[("locale", "en_US"), ("returnSignature", "false")]);

        let response = self.http.send(builder).await?;
        let status = response.status();
        if is_lookup_miss(status) {
            debug!(tracking_number, status = status.as_u16(), "UPS has no record of shipment");
            return Ok(TrackingReport::not_located());
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
