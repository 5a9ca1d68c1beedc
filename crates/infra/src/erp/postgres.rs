//! tokio-postgres adapter for [`ErpRepository`]
//!
//! Every query is parameterized. Character columns come back padded, so
//! text values are trimmed before they reach the domain types.

use async_trait::async_trait;
use chrono::NaiveDate;
use sheetsync_core::ErpRepository;
use sheetsync_domain::{
    normalize_queue, ErpConfig, OrderSnapshot, Result, SerialLine, SerialScope, SheetSyncError,
    ShipmentRecord, TicketKey,
};
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};

use crate::errors::InfraError;

const ORDER_QUERY: &str = "
SELECT sopnumbe, bachnumb, reqshipdate, cstponbr, user2ent
FROM (
    SELECT sopnumbe, bachnumb, reqshipdate::date AS reqshipdate, cstponbr, user2ent, 0 AS source
    FROM sop10100
    WHERE sopnumbe = ANY($1)
    UNION ALL
    SELECT sopnumbe, bachnumb, reqshipdate::date AS reqshipdate, cstponbr, user2ent, 1 AS source
    FROM sop30200
    WHERE sopnumbe = ANY($1)
) orders
ORDER BY source, sopnumbe
LIMIT 1";

const DEVICE_SERIALS_QUERY: &str = "
SELECT DISTINCT h.cstponbr, l.itemnmbr, s.serltnum
FROM sop10200 l
JOIN sop10100 h ON h.sopnumbe = l.sopnumbe
JOIN sop10201 s ON s.sopnumbe = l.sopnumbe AND s.itemnmbr = l.itemnmbr
WHERE l.soptype = 2
  AND l.sopnumbe LIKE ANY($1)
  AND s.serltnum NOT LIKE '%*%'
  AND l.itemnmbr = ANY($2)
ORDER BY h.cstponbr, l.itemnmbr";

const QUEUE_SERIALS_QUERY: &str = "
SELECT DISTINCT h.cstponbr, l.itemnmbr, s.serltnum
FROM sop10200 l
JOIN sop10100 h ON h.sopnumbe = l.sopnumbe
JOIN sop10201 s ON s.sopnumbe = l.sopnumbe AND s.itemnmbr = l.itemnmbr
WHERE l.soptype = 2
  AND l.sopnumbe LIKE ANY($1)
  AND s.serltnum NOT LIKE '%*%'
  AND h.bachnumb = ANY($2)
  AND s.itemnmbr NOT LIKE 'LIC%'
  AND l.itemdesc NOT LIKE '%License%'
  AND s.serltnum NOT LIKE '%MAUR0%'
ORDER BY h.cstponbr, l.itemnmbr";

const SHIPMENT_QUERY: &str = "
SELECT sopnumbe, bachnumb, tracking_number
FROM (
    SELECT h.sopnumbe, h.bachnumb, t.tracking_number, 0 AS source
    FROM sop30200 h
    LEFT JOIN sop10107 t ON t.sopnumbe = h.sopnumbe
    WHERE h.sopnumbe = ANY($1)
    UNION ALL
    SELECT h.sopnumbe, h.bachnumb, t.tracking_number, 1 AS source
    FROM sop10100 h
    LEFT JOIN sop10107 t ON t.sopnumbe = h.sopnumbe
    WHERE h.sopnumbe = ANY($1)
) shipments
ORDER BY (tracking_number IS NULL), source
LIMIT 1";

const OWNER_QUERY: &str = "
SELECT owner
FROM (
    SELECT e.name AS owner, 0 AS source
    FROM tickets.tickets_core_view t
    JOIN people.employees e ON e.employee_id = t.logged_by
    WHERE t.ticket_id::text = $1
    UNION ALL
    SELECT e.name AS owner, 1 AS source
    FROM tickets.can_tickets_core t
    JOIN people.employees e ON e.employee_id = t.logged_by
    WHERE t.ticket_id::text = $1
    UNION ALL
    SELECT a.fullname AS owner, 2 AS source
    FROM wom.provisioning_work_orders w
    JOIN wom.accounts a ON a.id = w.owner_id
    WHERE w.provisioning_wo_number::text = $1
) owners
WHERE owner IS NOT NULL AND TRIM(owner) <> ''
ORDER BY source
LIMIT 1";

fn db_err(err: tokio_postgres::Error) -> SheetSyncError {
    InfraError::from(err).into()
}

/// Trimmed text, `None` when blank.
fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `LIKE` patterns matching every order filed under the ticket.
fn serial_patterns(key: &TicketKey) -> Vec<String> {
    vec![format!("{key}%"), format!("CW{key}-1%")]
}

fn text(row: &Row, column: &str) -> Result<Option<String>> {
    row.try_get::<_, Option<String>>(column).map(clean).map_err(db_err)
}

async fn open(url: &str, label: &'static str) -> Result<Client> {
    let (client, connection) = tokio_postgres::connect(url, NoTls).await.map_err(db_err)?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(database = label, error = %err, "ERP connection closed with error");
        }
    });
    info!(database = label, "Connected to ERP database");
    Ok(client)
}

pub struct PostgresErpRepository {
    orders: Client,
    owners: Option<Client>,
}

impl PostgresErpRepository {
    /// Open the order database and, when configured, the separate helpdesk
    /// ownership database.
    pub async fn connect(config: &ErpConfig) -> Result<Self> {
        let orders = open(&config.url, "orders").await?;
        let owners = match config.owner_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => Some(open(url, "owners").await?),
            None => None,
        };
        Ok(Self { orders, owners })
    }

    fn owner_client(&self) -> &Client {
        self.owners.as_ref().unwrap_or(&self.orders)
    }
}

#[async_trait]
impl ErpRepository for PostgresErpRepository {
    async fn find_order(&self, key: &TicketKey) -> Result<Option<OrderSnapshot>> {
        let numbers = key.erp_order_numbers();
        let Some(row) = self.orders.query_opt(ORDER_QUERY, &[&numbers]).await.map_err(db_err)?
        else {
            return Ok(None);
        };

        Ok(Some(OrderSnapshot {
            order_number: text(&row, "sopnumbe")?.unwrap_or_default(),
            queue: normalize_queue(&text(&row, "bachnumb")?.unwrap_or_default()),
            requested_ship_date: row
                .try_get::<_, Option<NaiveDate>>("reqshipdate")
                .map_err(db_err)?,
            customer_po: text(&row, "cstponbr")?,
            created_by: text(&row, "user2ent")?,
        }))
    }

    async fn find_serials(
        &self,
        key: &TicketKey,
        scope: SerialScope<'_>,
    ) -> Result<Vec<SerialLine>> {
        let patterns = serial_patterns(key);
        let rows = match scope {
            SerialScope::Devices(items) => {
                self.orders.query(DEVICE_SERIALS_QUERY, &[&patterns, &items]).await
            }
            SerialScope::ConfigurationQueues(queues) => {
                self.orders.query(QUEUE_SERIALS_QUERY, &[&patterns, &queues]).await
            }
        }
        .map_err(db_err)?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in &rows {
            let (Some(item_number), Some(serial)) = (text(row, "itemnmbr")?, text(row, "serltnum")?)
            else {
                continue;
            };
            lines.push(SerialLine { item_number, serial_number: serial.to_uppercase() });
        }
        debug!(ticket = %key, lines = lines.len(), "loaded serial lines");
        Ok(lines)
    }

    async fn find_shipment(&self, key: &TicketKey) -> Result<Option<ShipmentRecord>> {
        let numbers = key.erp_order_numbers();
        let Some(row) = self.orders.query_opt(SHIPMENT_QUERY, &[&numbers]).await.map_err(db_err)?
        else {
            return Ok(None);
        };

        Ok(Some(ShipmentRecord {
            order_number: text(&row, "sopnumbe")?.unwrap_or_default(),
            queue: normalize_queue(&text(&row, "bachnumb")?.unwrap_or_default()),
            tracking_number: text(&row, "tracking_number")?,
        }))
    }

    async fn find_ticket_owner(&self, key: &TicketKey) -> Result<Option<String>> {
        let row = self
            .owner_client()
            .query_opt(OWNER_QUERY, &[&key.as_str()])
            .await
            .map_err(db_err)?;
        match row {
            Some(row) => text(&row, "owner"),
            None => Ok(None),
        }
    }
}
