//! Port interface for operator notifications

use async_trait::async_trait;
use sheetsync_domain::{Notification, Result};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}
