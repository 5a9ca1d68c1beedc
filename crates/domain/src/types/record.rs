//! Records, desired fields and patches

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::sheet::{ColumnMap, Row};
use super::value::FieldValue;

/// A sheet row viewed as column title -> value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub row_id: u64,
    pub row_number: Option<u32>,
    fields: HashMap<String, FieldValue>,
}

static EMPTY: FieldValue = FieldValue::Empty;

impl Record {
    pub fn new(row_id: u64) -> Self {
        Self { row_id, ..Self::default() }
    }

    pub fn from_row(row: &Row, columns: &ColumnMap) -> Self {
        let fields = columns
            .titles()
            .map(|(title, id)| {
                let cell = row.cell(id);
                let value = FieldValue::from_cell_with_display(
                    cell.and_then(|c| c.value.as_ref()),
                    cell.and_then(|c| c.display_value.as_deref()),
                );
                (title.to_string(), value)
            })
            .collect();
        Self { row_id: row.id, row_number: row.row_number, fields }
    }

    pub fn with_field(mut self, column: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(column.into(), value);
        self
    }

    /// Current value; `Empty` for unknown columns.
    pub fn value(&self, column: &str) -> &FieldValue {
        self.fields.get(column).unwrap_or(&EMPTY)
    }

    /// Canonical text of the current value.
    pub fn text(&self, column: &str) -> String {
        self.value(column).render()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
}

/// Authoritative value a reconciler wants a column to hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredField {
    pub column: String,
    pub value: FieldValue,
}

impl DesiredField {
    pub fn new(column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self { column: column.into(), value: value.into() }
    }
}

/// A single change to apply to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    pub column: String,
    pub value: FieldValue,
}

impl FieldPatch {
    /// Patch needed to bring `record` in line with `desired`, if any.
    pub fn plan(record: &Record, desired: &DesiredField) -> Option<Self> {
        let current = record.value(&desired.column);
        if desired.value.differs_from(current) {
            Some(Self { column: desired.column.clone(), value: desired.value.clone() })
        } else {
            None
        }
    }
}
