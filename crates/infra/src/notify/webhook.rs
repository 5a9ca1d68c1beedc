use async_trait::async_trait;
use reqwest::Method;
use sheetsync_core::Notifier;
use sheetsync_domain::{Notification, Result, SheetSyncError};
use tracing::{info, warn};
use url::Url;

use crate::http::HttpClient;

/// Posts notifications as JSON to a mail relay webhook.
pub struct WebhookNotifier {
    http: HttpClient,
    url: Url,
}

impl WebhookNotifier {
    pub fn new(http: HttpClient, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| {
            SheetSyncError::Config(format!("invalid notification.webhook_url '{url}': {e}"))
        })?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let builder = self.http.request(Method::POST, self.url.clone()).json(notification);
        let response = self.http.send(builder).await.map_err(|e| {
            SheetSyncError::Notification(format!("webhook request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetSyncError::Notification(format!(
                "webhook rejected notification (HTTP {}): {body}",
                status.as_u16()
            )));
        }

        info!(
            subject = %notification.subject,
            recipients = notification.recipients.len(),
            "Failure notification sent"
        );
        Ok(())
    }
}

/// Writes notifications to the log when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        warn!(
            subject = %notification.subject,
            recipients = ?notification.recipients,
            cc = ?notification.cc,
            "{}",
            notification.body
        );
        Ok(())
    }
}
