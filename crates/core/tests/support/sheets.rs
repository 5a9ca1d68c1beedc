//! In-memory sheet store and sheet builder

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use sheetsync_core::SheetStore;
use sheetsync_domain::{
    Cell, CellValue, Column, Result, Row, RowUpdate, Sheet, SheetSyncError,
};

/// Builds a sheet whose columns get ids `1..` in declaration order.
pub struct SheetBuilder {
    sheet: Sheet,
    next_row_id: u64,
}

impl SheetBuilder {
    pub fn new(id: u64, columns: &[&str]) -> Self {
        let columns = columns
            .iter()
            .enumerate()
            .map(|(i, title)| Column {
                id: i as u64 + 1,
                title: (*title).to_string(),
                index: i as u32,
                primary: i == 0,
            })
            .collect();
        Self {
            sheet: Sheet { id, name: format!("sheet {id}"), columns, rows: Vec::new() },
            next_row_id: 100,
        }
    }

    /// Append a row; unknown column titles panic.
    pub fn row(mut self, values: &[(&str, CellValue)]) -> Self {
        let cells = values
            .iter()
            .map(|(title, value)| Cell {
                column_id: self.column_id(title),
                value: Some(value.clone()),
                display_value: None,
            })
            .collect();
        let number = self.sheet.rows.len() as u32 + 1;
        self.sheet.rows.push(Row { id: self.next_row_id, row_number: Some(number), cells });
        self.next_row_id += 1;
        self
    }

    pub fn column_id(&self, title: &str) -> u64 {
        self.sheet
            .columns
            .iter()
            .find(|c| c.title == title)
            .map(|c| c.id)
            .unwrap_or_else(|| panic!("unknown column {title}"))
    }

    pub fn build(self) -> Sheet {
        self.sheet
    }
}

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

/// Sheet store backed by a map. Updates are applied to the stored sheets
/// and recorded in call order.
#[derive(Default)]
pub struct InMemorySheetStore {
    sheets: Mutex<HashMap<u64, Sheet>>,
    updates: Mutex<Vec<(u64, RowUpdate)>>,
    update_calls: Mutex<usize>,
    row_failures: Mutex<HashMap<u64, SheetSyncError>>,
    scripted_update_errors: Mutex<VecDeque<SheetSyncError>>,
    scripted_fetch_errors: Mutex<VecDeque<SheetSyncError>>,
    delete_calls: Mutex<Vec<(u64, Vec<u64>)>>,
    scripted_delete_errors: Mutex<VecDeque<SheetSyncError>>,
}

impl InMemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(self, sheet: Sheet) -> Self {
        self.sheets.lock().insert(sheet.id, sheet);
        self
    }

    /// Every update touching `row_id` fails with `error`.
    pub fn fail_row(&self, row_id: u64, error: SheetSyncError) {
        self.row_failures.lock().insert(row_id, error);
    }

    /// The next update calls fail with these errors, in order.
    pub fn script_update_errors(&self, errors: impl IntoIterator<Item = SheetSyncError>) {
        self.scripted_update_errors.lock().extend(errors);
    }

    pub fn script_fetch_errors(&self, errors: impl IntoIterator<Item = SheetSyncError>) {
        self.scripted_fetch_errors.lock().extend(errors);
    }

    /// The next delete calls fail with these errors, in order.
    pub fn script_delete_errors(&self, errors: impl IntoIterator<Item = SheetSyncError>) {
        self.scripted_delete_errors.lock().extend(errors);
    }

    /// `(sheet id, row ids)` of every delete call, failed ones included.
    pub fn delete_calls(&self) -> Vec<(u64, Vec<u64>)> {
        self.delete_calls.lock().clone()
    }

    pub fn row_count(&self, sheet_id: u64) -> usize {
        self.sheets.lock().get(&sheet_id).map_or(0, |sheet| sheet.rows.len())
    }

    pub fn updates(&self) -> Vec<(u64, RowUpdate)> {
        self.updates.lock().clone()
    }

    pub fn update_calls(&self) -> usize {
        *self.update_calls.lock()
    }

    /// Current value of a cell in the stored sheet.
    pub fn cell(&self, sheet_id: u64, row_id: u64, column_id: u64) -> Option<CellValue> {
        let sheets = self.sheets.lock();
        let row = sheets.get(&sheet_id)?.rows.iter().find(|r| r.id == row_id)?;
        row.cell(column_id).and_then(|c| c.value.clone())
    }
}

#[async_trait]
impl SheetStore for InMemorySheetStore {
    async fn fetch_sheet(&self, sheet_id: u64) -> Result<Sheet> {
        if let Some(error) = self.scripted_fetch_errors.lock().pop_front() {
            return Err(error);
        }
        self.sheets
            .lock()
            .get(&sheet_id)
            .cloned()
            .ok_or_else(|| SheetSyncError::NotFound(format!("sheet {sheet_id}")))
    }

    async fn update_rows(&self, sheet_id: u64, rows: &[RowUpdate]) -> Result<()> {
        *self.update_calls.lock() += 1;
        if let Some(error) = self.scripted_update_errors.lock().pop_front() {
            return Err(error);
        }
        if let Some(error) = rows.iter().find_map(|r| self.row_failures.lock().get(&r.row_id).cloned())
        {
            return Err(error);
        }

        let mut sheets = self.sheets.lock();
        let sheet = sheets
            .get_mut(&sheet_id)
            .ok_or_else(|| SheetSyncError::NotFound(format!("sheet {sheet_id}")))?;
        for update in rows {
            let row = sheet
                .rows
                .iter_mut()
                .find(|r| r.id == update.row_id)
                .ok_or_else(|| SheetSyncError::NotFound(format!("row {}", update.row_id)))?;
            for cell in &update.cells {
                match row.cells.iter_mut().find(|c| c.column_id == cell.column_id) {
                    Some(existing) => existing.value = Some(cell.value.clone()),
                    None => row.cells.push(Cell {
                        column_id: cell.column_id,
                        value: Some(cell.value.clone()),
                        display_value: None,
                    }),
                }
            }
            self.updates.lock().push((sheet_id, update.clone()));
        }
        Ok(())
    }

    async fn delete_rows(&self, sheet_id: u64, row_ids: &[u64]) -> Result<()> {
        self.delete_calls.lock().push((sheet_id, row_ids.to_vec()));
        if let Some(error) = self.scripted_delete_errors.lock().pop_front() {
            return Err(error);
        }
        if row_ids.len() > sheetsync_core::MAX_DELETE_BATCH {
            let message = format!("{} row ids in one delete", row_ids.len());
            return Err(SheetSyncError::InvalidInput(message));
        }
        let mut sheets = self.sheets.lock();
        if let Some(sheet) = sheets.get_mut(&sheet_id) {
            sheet.rows.retain(|r| !row_ids.contains(&r.id));
        }
        Ok(())
    }
}
