//! Per-record outcomes and the batch aggregate

use serde::Serialize;
use sheetsync_domain::{BatchFailure, FieldPatch, RecordFailure, Result, SheetSyncError};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// At least one patch was written.
    Updated { applied: Vec<FieldPatch>, not_applied: Vec<FieldPatch> },
    /// Nothing was written. `not_applied` holds patches whose writes failed.
    Unchanged { not_applied: Vec<FieldPatch> },
    Skipped { reason: String },
    Failed { error: String },
}

impl RecordOutcome {
    pub fn from_patches(applied: Vec<FieldPatch>, not_applied: Vec<FieldPatch>) -> Self {
        if applied.is_empty() {
            Self::Unchanged { not_applied }
        } else {
            Self::Updated { applied, not_applied }
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    fn not_applied_count(&self) -> usize {
        match self {
            Self::Updated { not_applied, .. } | Self::Unchanged { not_applied } => {
                not_applied.len()
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    pub row_id: u64,
    pub key: Option<String>,
    pub outcome: RecordOutcome,
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub fields_not_applied: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub sheet_id: u64,
    pub entries: Vec<RecordEntry>,
}

impl BatchReport {
    pub fn new(sheet_id: u64) -> Self {
        Self { sheet_id, entries: Vec::new() }
    }

    pub fn push(&mut self, row_id: u64, key: Option<String>, outcome: RecordOutcome) {
        self.entries.push(RecordEntry { row_id, key, outcome });
    }

    pub fn failures(&self) -> Vec<RecordFailure> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.outcome {
                RecordOutcome::Failed { error } => Some(RecordFailure::new(
                    entry.key.clone().unwrap_or_else(|| format!("row {}", entry.row_id)),
                    error,
                )),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary { processed: self.entries.len(), ..BatchSummary::default() };
        for entry in &self.entries {
            match entry.outcome {
                RecordOutcome::Updated { .. } => summary.updated += 1,
                RecordOutcome::Unchanged { .. } => summary.unchanged += 1,
                RecordOutcome::Skipped { .. } => summary.skipped += 1,
                RecordOutcome::Failed { .. } => summary.failed += 1,
            }
            summary.fields_not_applied += entry.outcome.not_applied_count();
        }
        summary
    }

    /// `Err(SheetSyncError::Batch)` naming every failed record, otherwise
    /// the summary.
    pub fn into_result(self) -> Result<BatchSummary> {
        let failures = self.failures();
        if failures.is_empty() {
            Ok(self.summary())
        } else {
            Err(SheetSyncError::Batch(BatchFailure { failures }))
        }
    }
}
