//! ConnectWise-style helpdesk REST adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use sheetsync_core::TicketingApi;
use sheetsync_domain::{Result, SheetSyncError, TicketDetails, TicketingConfig};
use tracing::warn;

use crate::errors::InfraError;
use crate::http::HttpClient;

const SERVICE: &str = "connectwise";

#[derive(Debug, Deserialize)]
struct NamedRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketPayload {
    id: u64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    status: Option<NamedRef>,
    #[serde(default)]
    company: Option<NamedRef>,
    #[serde(default, rename = "_info")]
    info: Option<TicketInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketInfo {
    #[serde(default)]
    entered_by: Option<String>,
}

impl From<TicketPayload> for TicketDetails {
    fn from(payload: TicketPayload) -> Self {
        Self {
            id: payload.id,
            summary: payload.summary,
            status: payload.status.and_then(|s| s.name),
            company: payload.company.and_then(|c| c.name),
            entered_by: payload.info.and_then(|i| i.entered_by),
        }
    }
}

/// Helpdesk client authenticating with `company+public` / private key basic
/// auth and a `clientid` header.
pub struct ConnectWiseClient {
    http: HttpClient,
    base_url: String,
    username: String,
    private_key: String,
}

impl ConnectWiseClient {
    pub fn new(config: &TicketingConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let client_id = HeaderValue::from_str(&config.client_id).map_err(|e| {
            SheetSyncError::Config(format!("ticketing.client_id is not a valid header value: {e}"))
        })?;
        headers.insert("clientid", client_id);

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: format!("{}+{}", config.company_id, config.public_key),
            private_key: config.private_key.clone(),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(Method::GET, format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.private_key))
    }
}

#[async_trait]
impl TicketingApi for ConnectWiseClient {
    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<TicketDetails>> {
        let response = self.http.send(self.get(&format!("/service/tickets/{ticket_id}"))).await?;
        match response.status() {
            StatusCode::OK => {
                let payload: TicketPayload =
                    response.json().await.map_err(|e| SheetSyncError::from(InfraError::from(e)))?;
                Ok(Some(payload.into()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(
                    service = SERVICE,
                    ticket_id,
                    status = status.as_u16(),
                    body = %body,
                    "Ticket lookup failed"
                );
                Ok(None)
            }
        }
    }
}
