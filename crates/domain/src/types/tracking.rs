use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{RETURNED_TO_SENDER_STATUS, SHIPMENT_NOT_LOCATED_MESSAGE};

/// Latest known state of a shipment as reported by a carrier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackingReport {
    pub status: String,
    pub delivery_date: Option<NaiveDate>,
    /// Human-readable estimate such as `"AM"` or `"EOD"`.
    pub estimated_delivery: Option<String>,
}

impl TrackingReport {
    pub fn not_located() -> Self {
        Self { status: SHIPMENT_NOT_LOCATED_MESSAGE.to_string(), ..Self::default() }
    }

    /// Status text to write to the sheet.
    ///
    /// Anything mentioning both "return" and "sender" collapses to
    /// `Returned to sender`.
    pub fn sheet_status(&self) -> String {
        let lower = self.status.to_lowercase();
        if lower.contains("return") && lower.contains("sender") {
            RETURNED_TO_SENDER_STATUS.to_string()
        } else {
            self.status.trim().to_string()
        }
    }
}
