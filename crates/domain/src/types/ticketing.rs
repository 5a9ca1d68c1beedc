use serde::{Deserialize, Serialize};

/// Subset of a helpdesk ticket used by the jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    pub id: u64,
    pub summary: String,
    pub status: Option<String>,
    pub company: Option<String>,
    pub entered_by: Option<String>,
}
