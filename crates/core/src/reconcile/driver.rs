//! Reconciliation driver
//!
//! Walks a sheet snapshot in fetch order. For each record it resolves the
//! ticket key, asks the [`RowReconciler`] for the authoritative fields and
//! writes every differing, non-empty value as its own row update through the
//! retrying invoker. An error while processing one record is captured in the
//! [`BatchReport`] and the batch moves on.

use std::sync::Arc;

use async_trait::async_trait;
use sheetsync_common::resilience::{OperationOutcome, RemoteCallInvoker, RetryPolicy, Sleeper};
use sheetsync_domain::{
    CellUpdate, ColumnMap, DesiredField, FieldPatch, Record, Result, RowUpdate, Sheet,
    SheetSyncError, TicketKey,
};
use tracing::{debug, error, info, warn};

use super::classifier::SheetApiClassifier;
use super::report::{BatchReport, RecordOutcome};
use crate::sheet_ports::{SheetStore, MAX_DELETE_BATCH};

/// Job-specific half of a reconciliation pass.
#[async_trait]
pub trait RowReconciler: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Column holding the ticket key.
    fn key_column(&self) -> &str;

    /// Reason to leave a record alone before any lookup is made.
    fn skip_reason(&self, _record: &Record) -> Option<String> {
        None
    }

    /// Authoritative values for `record`, in the order they should be
    /// written. Empty values are never written.
    async fn desired_fields(&self, key: &TicketKey, record: &Record)
        -> Result<Vec<DesiredField>>;

    fn describe_outcome(&self, key: &TicketKey, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Updated { applied, not_applied } => info!(
                job = self.name(),
                ticket = %key,
                applied = applied.len(),
                not_applied = not_applied.len(),
                "Record updated"
            ),
            RecordOutcome::Unchanged { not_applied } if !not_applied.is_empty() => warn!(
                job = self.name(),
                ticket = %key,
                not_applied = not_applied.len(),
                "Record left unchanged, writes failed"
            ),
            RecordOutcome::Unchanged { .. } => {
                info!(job = self.name(), ticket = %key, "No changes needed")
            }
            RecordOutcome::Skipped { reason } => {
                info!(job = self.name(), ticket = %key, reason = %reason, "Record skipped")
            }
            RecordOutcome::Failed { error } => {
                warn!(job = self.name(), ticket = %key, error = %error, "Record failed")
            }
        }
    }
}

pub struct ReconciliationDriver {
    store: Arc<dyn SheetStore>,
    invoker: RemoteCallInvoker<SheetApiClassifier>,
}

impl ReconciliationDriver {
    pub fn new(store: Arc<dyn SheetStore>, policy: RetryPolicy) -> Self {
        Self { store, invoker: RemoteCallInvoker::new(policy, SheetApiClassifier) }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.invoker = self.invoker.with_sleeper(sleeper);
        self
    }

    pub fn store(&self) -> &Arc<dyn SheetStore> {
        &self.store
    }

    /// Fetch a sheet snapshot through the invoker.
    pub async fn fetch_sheet(&self, sheet_id: u64) -> Result<Sheet> {
        let store = &self.store;
        match self.invoker.invoke("fetch_sheet", || store.fetch_sheet(sheet_id)).await {
            OperationOutcome::Success { value, .. } => Ok(value),
            OperationOutcome::Failed(failure) => Err(SheetSyncError::Network(format!(
                "Failed to fetch sheet {sheet_id} data after retries: {failure}"
            ))),
        }
    }

    /// Delete `row_ids` in batches of [`MAX_DELETE_BATCH`], each batch
    /// through the invoker. A batch the invoker gives up on is logged and the
    /// rest still go out.
    ///
    /// Returns how many rows were left on the sheet.
    pub async fn delete_rows(&self, sheet_id: u64, row_ids: &[u64]) -> usize {
        let store = &self.store;
        let mut not_deleted = 0;
        for batch in row_ids.chunks(MAX_DELETE_BATCH) {
            let outcome =
                self.invoker.invoke("delete_rows", move || store.delete_rows(sheet_id, batch)).await;
            match outcome {
                OperationOutcome::Success { attempts, .. } => {
                    debug!(sheet_id, rows = batch.len(), attempts, "Rows deleted")
                }
                OperationOutcome::Failed(failure) => {
                    error!(
                        sheet_id,
                        rows = batch.len(),
                        error = %failure,
                        "Failed to delete rows after retries"
                    );
                    not_deleted += batch.len();
                }
            }
        }
        not_deleted
    }

    /// Fetch `sheet_id` and reconcile every record on it.
    pub async fn run(&self, sheet_id: u64, reconciler: &dyn RowReconciler) -> Result<BatchReport> {
        let sheet = self.fetch_sheet(sheet_id).await?;
        self.reconcile_sheet(&sheet, reconciler).await
    }

    /// Reconcile an already fetched snapshot.
    ///
    /// Only a missing key column fails the whole call; everything else is
    /// recorded per record.
    pub async fn reconcile_sheet(
        &self,
        sheet: &Sheet,
        reconciler: &dyn RowReconciler,
    ) -> Result<BatchReport> {
        let columns = ColumnMap::from_sheet(sheet);
        columns.require(reconciler.key_column())?;

        info!(
            job = reconciler.name(),
            sheet_id = sheet.id,
            rows = sheet.rows.len(),
            "Reconciling sheet"
        );

        let mut report = BatchReport::new(sheet.id);
        for row in &sheet.rows {
            let record = Record::from_row(row, &columns);
            let Some(key) = TicketKey::parse(&record.text(reconciler.key_column())) else {
                debug!(job = reconciler.name(), row_id = row.id, "Row has no ticket key");
                report.push(
                    row.id,
                    None,
                    RecordOutcome::Skipped { reason: "no ticket key".to_string() },
                );
                continue;
            };

            let outcome = match self.reconcile_record(sheet.id, &columns, reconciler, &key, &record).await
            {
                Ok(outcome) => outcome,
                Err(error) => RecordOutcome::Failed { error: error.to_string() },
            };
            reconciler.describe_outcome(&key, &outcome);
            report.push(row.id, Some(key.to_string()), outcome);
        }

        let summary = report.summary();
        info!(
            job = reconciler.name(),
            sheet_id = sheet.id,
            processed = summary.processed,
            updated = summary.updated,
            failed = summary.failed,
            "Sheet reconciled"
        );
        Ok(report)
    }

    async fn reconcile_record(
        &self,
        sheet_id: u64,
        columns: &ColumnMap,
        reconciler: &dyn RowReconciler,
        key: &TicketKey,
        record: &Record,
    ) -> Result<RecordOutcome> {
        if let Some(reason) = reconciler.skip_reason(record) {
            return Ok(RecordOutcome::Skipped { reason });
        }

        let desired = reconciler.desired_fields(key, record).await?;
        let patches = desired
            .iter()
            .filter_map(|field| FieldPatch::plan(record, field))
            .map(|patch| columns.require(&patch.column).map(|column_id| (column_id, patch)))
            .collect::<Result<Vec<_>>>()?;

        let mut applied = Vec::new();
        let mut not_applied = Vec::new();
        for (column_id, patch) in patches {
            if self.apply_patch(sheet_id, record.row_id, column_id, &patch).await? {
                info!(
                    job = reconciler.name(),
                    ticket = %key,
                    column = %patch.column,
                    from = %record.value(&patch.column),
                    to = %patch.value,
                    "Field updated"
                );
                applied.push(patch);
            } else {
                not_applied.push(patch);
            }
        }
        Ok(RecordOutcome::from_patches(applied, not_applied))
    }

    /// Write one patch. `Ok(false)` when the invoker gave up.
    async fn apply_patch(
        &self,
        sheet_id: u64,
        row_id: u64,
        column_id: u64,
        patch: &FieldPatch,
    ) -> Result<bool> {
        let value = patch.value.to_cell().ok_or_else(|| {
            SheetSyncError::Internal(format!("empty patch for column '{}'", patch.column))
        })?;
        let update = RowUpdate::single(row_id, CellUpdate::new(column_id, value));
        let rows = std::slice::from_ref(&update);
        let store = &self.store;

        match self.invoker.invoke("update_rows", move || store.update_rows(sheet_id, rows)).await {
            OperationOutcome::Success { .. } => Ok(true),
            OperationOutcome::Failed(failure) => {
                warn!(
                    sheet_id,
                    row_id,
                    column = %patch.column,
                    error = %failure,
                    "Field not updated this pass"
                );
                Ok(false)
            }
        }
    }
}
