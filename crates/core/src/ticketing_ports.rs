//! Port interface for the helpdesk ticketing API

use async_trait::async_trait;
use sheetsync_domain::{Result, TicketDetails};

#[async_trait]
pub trait TicketingApi: Send + Sync {
    /// `Ok(None)` when the ticket does not exist or the API declines to
    /// return it.
    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<TicketDetails>>;
}
