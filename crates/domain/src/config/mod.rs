//! Configuration structures
//!
//! Everything the jobs need to reach external systems is carried here and
//! passed into constructors. Nothing below is read from globals.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONFIGURATION_QUEUES, EQUIPMENT_TICKET_COLUMN, EQUIPMENT_TYPE_COLUMN,
    ESCALATED_ORDER_COLUMN, FAILURE_NOTIFICATION_SUBJECT, MAC_CHECK_COLUMN, ORIGINATOR_COLUMN,
    REQUESTED_SHIP_COLUMN, SERIAL_NUMBERS_COLUMN, STATUS_COLUMN,
};
use crate::errors::{Result, SheetSyncError};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub sheets: SheetsConfig,
    pub erp: ErpConfig,
    pub ticketing: TicketingConfig,
    #[serde(default)]
    pub carriers: CarriersConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sheets.access_token.trim().is_empty() {
            return Err(SheetSyncError::Config("sheets.access_token must be set".into()));
        }
        if self.erp.url.trim().is_empty() {
            return Err(SheetSyncError::Config("erp.url must be set".into()));
        }
        if self.ticketing.base_url.trim().is_empty() {
            return Err(SheetSyncError::Config("ticketing.base_url must be set".into()));
        }
        if self.ticketing.company_id.trim().is_empty() {
            return Err(SheetSyncError::Config("ticketing.company_id must be set".into()));
        }
        require_sheet_id("sheets.order_sheet_id", self.sheets.order_sheet_id)?;
        require_sheet_id("sheets.escalation_sheet_id", self.sheets.escalation_sheet_id)?;
        for id in &self.sheets.helper_sheet_ids {
            require_sheet_id("sheets.helper_sheet_ids", *id)?;
        }
        if self.retry.max_attempts == 0 {
            return Err(SheetSyncError::Config("retry.max_attempts must be at least 1".into()));
        }
        self.schedule.main_jobs_cutoff()?;
        self.schedule.final_tracking_window.bounds()?;
        for sheet in &self.sheets.tracking {
            let field = format!("tracking sheet '{}' sheet_id", sheet.label);
            require_sheet_id(&field, sheet.sheet_id)?;
            for window in &sheet.windows {
                window.bounds()?;
            }
        }
        require_timezone(&self.schedule.timezone)
    }
}

fn require_sheet_id(field: &str, id: u64) -> Result<()> {
    if id == 0 {
        return Err(SheetSyncError::Config(format!("{field} must be a non-zero sheet id")));
    }
    Ok(())
}

fn require_timezone(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SheetSyncError::Config("schedule.timezone must be set".into()));
    }
    Ok(())
}

/// Sheet store access and sheet layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "default_sheets_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub access_token: String,
    pub order_sheet_id: u64,
    pub escalation_sheet_id: u64,
    #[serde(default)]
    pub order_columns: OrderColumns,
    #[serde(default = "default_ticket_column")]
    pub escalation_ticket_column: String,
    #[serde(default)]
    pub tracking: Vec<TrackingSheetConfig>,
    /// Scratch sheets emptied at the start of each main run.
    #[serde(default)]
    pub helper_sheet_ids: Vec<u64>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_sheets_base_url() -> String {
    "https://api.smartsheet.com/2.0".to_string()
}

fn default_ticket_column() -> String {
    EQUIPMENT_TICKET_COLUMN.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// Column titles on the order sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderColumns {
    pub ticket: String,
    pub requested_ship: String,
    pub status: String,
    pub originator: String,
    pub escalated: String,
    pub equipment_type: String,
    pub serial_numbers: String,
    pub mac_check: String,
}

impl Default for OrderColumns {
    fn default() -> Self {
        Self {
            ticket: EQUIPMENT_TICKET_COLUMN.to_string(),
            requested_ship: REQUESTED_SHIP_COLUMN.to_string(),
            status: STATUS_COLUMN.to_string(),
            originator: ORIGINATOR_COLUMN.to_string(),
            escalated: ESCALATED_ORDER_COLUMN.to_string(),
            equipment_type: EQUIPMENT_TYPE_COLUMN.to_string(),
            serial_numbers: SERIAL_NUMBERS_COLUMN.to_string(),
            mac_check: MAC_CHECK_COLUMN.to_string(),
        }
    }
}

/// One sheet watched by the tracking job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSheetConfig {
    pub label: String,
    pub sheet_id: u64,
    pub ticket_column: String,
    pub tracking_column: String,
    pub status_column: String,
    pub delivery_date_column: String,
    #[serde(default)]
    pub windows: Vec<ScheduleWindow>,
}

/// Inclusive `HH:MM` time-of-day window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start: String,
    pub end: String,
}

impl ScheduleWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    pub fn bounds(&self) -> Result<(NaiveTime, NaiveTime)> {
        Ok((parse_time_of_day(&self.start)?, parse_time_of_day(&self.end)?))
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| SheetSyncError::Config(format!("invalid time of day '{raw}': {e}")))
}

/// ERP database connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErpConfig {
    /// Connection string for the order database.
    #[serde(default)]
    pub url: String,
    /// Separate connection string for the helpdesk ownership views. Falls
    /// back to `url` when absent.
    #[serde(default)]
    pub owner_url: Option<String>,
    #[serde(default = "default_configuration_queues")]
    pub configuration_queues: Vec<String>,
}

fn default_configuration_queues() -> Vec<String> {
    DEFAULT_CONFIGURATION_QUEUES.iter().map(ToString::to_string).collect()
}

/// Helpdesk ticketing API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketingConfig {
    pub base_url: String,
    pub company_id: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub client_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarriersConfig {
    #[serde(default)]
    pub ups: Option<CarrierApiConfig>,
    #[serde(default)]
    pub fedex: Option<CarrierApiConfig>,
}

/// OAuth client-credentials carrier API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierApiConfig {
    pub token_url: String,
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Webhook receiving failure reports. Reports are only logged when unset.
    pub webhook_url: Option<String>,
    pub subject: String,
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            subject: FAILURE_NOTIFICATION_SUBJECT.to_string(),
            recipients: Vec::new(),
            cc: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA timezone name used for every time-of-day decision.
    pub timezone: String,
    /// Main jobs run only before this local time.
    pub main_jobs_before: String,
    /// Window in which every tracking sheet gets a last pass.
    pub final_tracking_window: ScheduleWindow,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            main_jobs_before: "18:30".to_string(),
            final_tracking_window: ScheduleWindow::new("19:29", "19:44"),
        }
    }
}

impl ScheduleConfig {
    pub fn main_jobs_cutoff(&self) -> Result<NaiveTime> {
        parse_time_of_day(&self.main_jobs_before)
    }
}

/// Retry tuning for sheet store calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub rate_limit_base_secs: u64,
    pub rate_limit_max_secs: u64,
    pub server_error_base_secs: u64,
    pub server_error_max_secs: u64,
    pub jitter_ceiling_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            rate_limit_base_secs: 60,
            rate_limit_max_secs: 300,
            server_error_base_secs: 10,
            server_error_max_secs: 60,
            jitter_ceiling_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the dated log file. File logging is off when unset.
    pub directory: Option<String>,
    pub console_level: String,
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: Some("logs".to_string()),
            console_level: "warn".to_string(),
            file_level: "info".to_string(),
        }
    }
}
