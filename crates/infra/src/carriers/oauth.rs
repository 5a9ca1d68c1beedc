//! OAuth client-credentials token for the carrier APIs
//!
//! A token is requested on first use and reused for the rest of the run.
//! Runs are short, so expiry is not tracked.

use reqwest::Method;
use serde::Deserialize;
use sheetsync_domain::{CarrierApiConfig, Result, SheetSyncError};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// How client credentials travel in the token request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStyle {
    /// HTTP basic auth header, `grant_type` in the form body.
    BasicAuth,
    /// `client_id` and `client_secret` in the form body.
    FormBody,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct ClientCredentialsToken {
    service: &'static str,
    http: HttpClient,
    token_url: String,
    client_id: String,
    client_secret: String,
    style: CredentialStyle,
    token: OnceCell<String>,
}

impl ClientCredentialsToken {
    pub fn new(
        service: &'static str,
        http: HttpClient,
        config: &CarrierApiConfig,
        style: CredentialStyle,
    ) -> Self {
        Self {
            service,
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            style,
            token: OnceCell::new(),
        }
    }

    /// Cached bearer token, fetched on first call.
    pub async fn access_token(&self) -> Result<&str> {
        let token = self.token.get_or_try_init(|| self.request_token()).await?;
        Ok(token.as_str())
    }

    async fn request_token(&self) -> Result<String> {
        let builder = self
            .http
            .request(Method::POST, &self.token_url)
            .header("accept", "application/json");
        let builder = match self.style {
            CredentialStyle::BasicAuth => builder
                .basic_auth(&self.client_id, Some(&self.client_secret))
                .form(&[("grant_type", "client_credentials")]),
            CredentialStyle::FormBody => builder.form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ]),
        };

        let response = self.http.send(builder).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetSyncError::api(
                self.service,
                Some(status.as_u16()),
                None,
                format!("token request rejected: {body}"),
            ));
        }

        let parsed: TokenResponse =
            response.json().await.map_err(|e| SheetSyncError::from(InfraError::from(e)))?;
        debug!(service = self.service, "obtained carrier access token");
        Ok(parsed.access_token)
    }
}
