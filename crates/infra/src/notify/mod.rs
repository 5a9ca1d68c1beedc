//! Operator notification adapters

use std::sync::Arc;

use sheetsync_core::Notifier;
use sheetsync_domain::{NotificationConfig, Result};

use crate::http::HttpClient;

pub mod webhook;

pub use webhook::{LogNotifier, WebhookNotifier};

/// Webhook notifier when a URL is configured, otherwise the log.
pub fn notifier_for(config: &NotificationConfig, http: &HttpClient) -> Result<Arc<dyn Notifier>> {
    match config.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(http.clone(), url)?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}
