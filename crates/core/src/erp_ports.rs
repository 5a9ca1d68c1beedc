//! Port interface for the ERP order database

use async_trait::async_trait;
use sheetsync_domain::{OrderSnapshot, Result, SerialLine, SerialScope, ShipmentRecord, TicketKey};

#[async_trait]
pub trait ErpRepository: Send + Sync {
    /// Sales order filed under any of the ticket's order numbers.
    async fn find_order(&self, key: &TicketKey) -> Result<Option<OrderSnapshot>>;

    /// Serialized lines on the ticket's orders, ordered by customer PO and
    /// item.
    async fn find_serials(&self, key: &TicketKey, scope: SerialScope<'_>)
        -> Result<Vec<SerialLine>>;

    async fn find_shipment(&self, key: &TicketKey) -> Result<Option<ShipmentRecord>>;

    /// Owner of the ticket according to the helpdesk and work-order views.
    async fn find_ticket_owner(&self, key: &TicketKey) -> Result<Option<String>>;
}
