//! Port interface for the collaboration sheet service

use async_trait::async_trait;
use sheetsync_domain::{Result, RowUpdate, Sheet};

/// Most row ids a single [`SheetStore::delete_rows`] call may carry.
pub const MAX_DELETE_BATCH: usize = 100;

/// Rows-and-columns sheet API.
///
/// Implementations report API failures as `SheetSyncError::Api` carrying the
/// HTTP status and the service's error code so callers can classify them.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Fetch a sheet with all columns and rows.
    async fn fetch_sheet(&self, sheet_id: u64) -> Result<Sheet>;

    /// Update cells of existing rows.
    async fn update_rows(&self, sheet_id: u64, rows: &[RowUpdate]) -> Result<()>;

    /// Delete up to [`MAX_DELETE_BATCH`] rows. Ids no longer on the sheet are
    /// ignored.
    async fn delete_rows(&self, sheet_id: u64, row_ids: &[u64]) -> Result<()>;
}
