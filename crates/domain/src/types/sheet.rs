//! Sheet snapshot and row update request types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::CellValue;
use crate::errors::{Result, SheetSyncError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: u64,
    #[serde(default)]
    pub row_number: Option<u32>,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn cell(&self, column_id: u64) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column_id == column_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub column_id: u64,
    #[serde(default)]
    pub value: Option<CellValue>,
    #[serde(default)]
    pub display_value: Option<String>,
}

/// Column titles resolved to ids, built once per fetched sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    by_title: HashMap<String, u64>,
}

impl ColumnMap {
    pub fn from_columns(columns: &[Column]) -> Self {
        Self { by_title: columns.iter().map(|c| (c.title.clone(), c.id)).collect() }
    }

    pub fn from_sheet(sheet: &Sheet) -> Self {
        Self::from_columns(&sheet.columns)
    }

    pub fn id(&self, title: &str) -> Option<u64> {
        self.by_title.get(title).copied()
    }

    /// Column id for `title`, or an `InvalidInput` error naming it.
    pub fn require(&self, title: &str) -> Result<u64> {
        self.id(title)
            .ok_or_else(|| SheetSyncError::InvalidInput(format!("column '{title}' not found")))
    }

    pub fn titles(&self) -> impl Iterator<Item = (&str, u64)> {
        self.by_title.iter().map(|(t, id)| (t.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

/// One cell of a row update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    pub column_id: u64,
    pub value: CellValue,
    pub strict: bool,
}

impl CellUpdate {
    pub fn new(column_id: u64, value: CellValue) -> Self {
        Self { column_id, value, strict: false }
    }
}

/// Request to update cells of an existing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowUpdate {
    #[serde(rename = "id")]
    pub row_id: u64,
    pub cells: Vec<CellUpdate>,
}

impl RowUpdate {
    pub fn single(row_id: u64, cell: CellUpdate) -> Self {
        Self { row_id, cells: vec![cell] }
    }
}
