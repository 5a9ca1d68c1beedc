//! Smartsheet REST adapter for [`SheetStore`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sheetsync_core::{SheetStore, MAX_DELETE_BATCH};
use sheetsync_domain::{Result, RowUpdate, Sheet, SheetSyncError, SheetsConfig};
use tracing::debug;
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;

const SERVICE: &str = "smartsheet";

/// Error body returned by the sheet API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    error_code: Option<u32>,
    message: Option<String>,
}

pub struct SmartsheetClient {
    http: HttpClient,
    base_url: String,
    access_token: String,
}

impl SmartsheetClient {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Self::with_http(http, &config.api_base_url, &config.access_token)
    }

    pub fn with_http(http: HttpClient, base_url: &str, access_token: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            SheetSyncError::Config(format!("invalid sheets.api_base_url '{base_url}': {e}"))
        })?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn rows_url(&self, sheet_id: u64) -> String {
        format!("{}/sheets/{sheet_id}/rows", self.base_url)
    }

    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<Response> {
        let response = self.http.send(builder.bearer_auth(&self.access_token)).await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }
}

/// Turn a non-success response into an `Api` error with the service's code.
async fn api_error(response: Response) -> SheetSyncError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => (parsed.error_code, parsed.message),
        Err(_) => (None, None),
    };
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());
    SheetSyncError::api(SERVICE, Some(status.as_u16()), code, message)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|err| SheetSyncError::from(InfraError::from(err)))
}

#[async_trait]
impl SheetStore for SmartsheetClient {
    async fn fetch_sheet(&self, sheet_id: u64) -> Result<Sheet> {
        let url = format!("{}/sheets/{sheet_id}", self.base_url);
        let response = self.execute(self.http.request(Method::GET, url)).await?;
        let sheet: Sheet = read_json(response).await?;
        debug!(sheet_id, rows = sheet.rows.len(), columns = sheet.columns.len(), "fetched sheet");
        Ok(sheet)
    }

    async fn update_rows(&self, sheet_id: u64, rows: &[RowUpdate]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let builder = self.http.request(Method::PUT, self.rows_url(sheet_id)).json(rows);
        self.execute(builder).await?;
        Ok(())
    }

    async fn delete_rows(&self, sheet_id: u64, row_ids: &[u64]) -> Result<()> {
        if row_ids.is_empty() {
            return Ok(());
        }
        if row_ids.len() > MAX_DELETE_BATCH {
            return Err(SheetSyncError::InvalidInput(format!(
                "{} row ids in one delete, at most {MAX_DELETE_BATCH} allowed",
                row_ids.len()
            )));
        }
        let ids = row_ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let builder = self
            .http
            .request(Method::DELETE, self.rows_url(sheet_id))
            .query(&[("ids", ids.as_str()), ("ignoreRowsNotFound", "true")]);
        self.execute(builder).await?;
        Ok(())
    }
}
