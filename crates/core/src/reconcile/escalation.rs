use std::collections::HashSet;

use sheetsync_domain::{
    extract_ticket_numbers, normalize_ticket_number, ColumnMap, Record, Sheet, TicketKey,
};

/// Ticket keys mentioned anywhere in the escalation sheet's ticket column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscalationIndex {
    keys: HashSet<String>,
}

impl EscalationIndex {
    pub fn from_sheet(sheet: &Sheet, ticket_column: &str) -> Self {
        let columns = ColumnMap::from_sheet(sheet);
        let texts = sheet
            .rows
            .iter()
            .map(|row| Record::from_row(row, &columns).text(ticket_column));
        Self::from_texts(texts)
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = texts
            .into_iter()
            .flat_map(|text| extract_ticket_numbers(text.as_ref()))
            .map(|candidate| normalize_ticket_number(&candidate))
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }

    pub fn contains(&self, key: &TicketKey) -> bool {
        self.keys.contains(key.as_str())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
