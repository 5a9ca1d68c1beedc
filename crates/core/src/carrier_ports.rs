//! Port interface for shipping carrier tracking APIs

use async_trait::async_trait;
use sheetsync_domain::{Carrier, Result, TicketKey, TrackingReport};

#[async_trait]
pub trait CarrierTracker: Send + Sync {
    fn carrier(&self) -> Carrier;

    /// Latest status for `tracking_number`. `reference` is sent along as the
    /// request's transaction id.
    async fn track(&self, tracking_number: &str, reference: &TicketKey) -> Result<TrackingReport>;
}
