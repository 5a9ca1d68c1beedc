//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Searches multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Credentials set in the environment override those in the file
//!
//! ## Environment Variables
//! Required for environment-only loading:
//! - `SHEETSYNC_SHEETS_ACCESS_TOKEN`: Sheet API bearer token
//! - `SHEETSYNC_ORDER_SHEET_ID`: Order sheet id
//! - `SHEETSYNC_ESCALATION_SHEET_ID`: Escalation sheet id
//! - `SHEETSYNC_ERP_URL`: ERP connection string
//! - `SHEETSYNC_TICKETING_BASE_URL`: Helpdesk API base URL
//! - `SHEETSYNC_TICKETING_COMPANY_ID`: Helpdesk company id
//!
//! Optional:
//! - `SHEETSYNC_SHEETS_API_BASE_URL`, `SHEETSYNC_ERP_OWNER_URL`
//! - `SHEETSYNC_TICKETING_PUBLIC_KEY`, `SHEETSYNC_TICKETING_PRIVATE_KEY`,
//!   `SHEETSYNC_TICKETING_CLIENT_ID`
//! - `SHEETSYNC_TRACKING_SHEETS`: JSON array of tracking sheet definitions
//! - `SHEETSYNC_HELPER_SHEET_IDS`: Sheets emptied before the main jobs (comma
//!   separated)
//! - `SHEETSYNC_UPS_CLIENT_ID`, `SHEETSYNC_UPS_CLIENT_SECRET`
//! - `SHEETSYNC_FEDEX_CLIENT_ID`, `SHEETSYNC_FEDEX_CLIENT_SECRET`
//! - `SHEETSYNC_NOTIFY_WEBHOOK_URL`, `SHEETSYNC_NOTIFY_RECIPIENTS`,
//!   `SHEETSYNC_NOTIFY_CC` (comma separated)
//! - `SHEETSYNC_TIMEZONE`, `SHEETSYNC_LOG_DIR`
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./sheetsync.{toml,json}` then `./config.{toml,json}` (current working
//!    directory)
//! 2. The same names in the parent directory
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use sheetsync_domain::{
    AppConfig, CarrierApiConfig, CarriersConfig, ErpConfig, NotificationConfig, Result,
    ScheduleConfig, SheetSyncError, SheetsConfig, TicketingConfig, TrackingSheetConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["sheetsync.toml", "sheetsync.json", "config.toml", "config.json"];

const UPS_TOKEN_URL: &str = "https://onlinetools.ups.com/security/v1/oauth/token";
const UPS_API_BASE_URL: &str = "https://onlinetools.ups.com";
const FEDEX_TOKEN_URL: &str = "https://apis.fedex.com/oauth/token";
const FEDEX_API_BASE_URL: &str = "https://apis.fedex.com";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SheetSyncError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<AppConfig> {
    // Try loading from environment first
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            let mut config = load_from_file(None)?;
            apply_env_overrides(&mut config);
            Ok(config)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Sections without
/// variables take their defaults.
///
/// # Errors
/// Returns `SheetSyncError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    let access_token = env_var("SHEETSYNC_SHEETS_ACCESS_TOKEN")?;
    let order_sheet_id = env_u64("SHEETSYNC_ORDER_SHEET_ID")?;
    let escalation_sheet_id = env_u64("SHEETSYNC_ESCALATION_SHEET_ID")?;
    let erp_url = env_var("SHEETSYNC_ERP_URL")?;
    let ticketing_base_url = env_var("SHEETSYNC_TICKETING_BASE_URL")?;
    let company_id = env_var("SHEETSYNC_TICKETING_COMPANY_ID")?;

    let tracking = match env_opt("SHEETSYNC_TRACKING_SHEETS") {
        Some(raw) => serde_json::from_str::<Vec<TrackingSheetConfig>>(&raw).map_err(|e| {
            SheetSyncError::Config(format!("Invalid SHEETSYNC_TRACKING_SHEETS: {}", e))
        })?,
        None => Vec::new(),
    };

    let helper_sheet_ids = match env_opt("SHEETSYNC_HELPER_SHEET_IDS") {
        Some(raw) => parse_sheet_ids(&raw)?,
        None => Vec::new(),
    };

    // Serde defaults stand in for everything not set here
    let mut sheets: SheetsConfig = serde_json::from_value(serde_json::json!({
        "order_sheet_id": order_sheet_id,
        "escalation_sheet_id": escalation_sheet_id,
    }))
    .map_err(|e| SheetSyncError::Config(format!("Invalid sheet settings: {}", e)))?;
    sheets.access_token = access_token;
    sheets.tracking = tracking;
    sheets.helper_sheet_ids = helper_sheet_ids;
    if let Some(base) = env_opt("SHEETSYNC_SHEETS_API_BASE_URL") {
        sheets.api_base_url = base;
    }

    let erp: ErpConfig = serde_json::from_value(serde_json::json!({ "url": erp_url }))
        .map_err(|e| SheetSyncError::Config(format!("Invalid ERP settings: {}", e)))?;

    let mut schedule = ScheduleConfig::default();
    if let Some(timezone) = env_opt("SHEETSYNC_TIMEZONE") {
        schedule.timezone = timezone;
    }

    let mut config = AppConfig {
        sheets,
        erp,
        ticketing: TicketingConfig {
            base_url: ticketing_base_url,
            company_id,
            public_key: String::new(),
            private_key: String::new(),
            client_id: String::new(),
        },
        carriers: CarriersConfig::default(),
        notification: NotificationConfig::default(),
        schedule,
        retry: Default::default(),
        logging: Default::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Overlay credentials and endpoints set in the environment.
///
/// Carrier sections are created when both halves of a client credential pair
/// are present.
pub fn apply_env_overrides(config: &mut AppConfig) {
    override_with(&mut config.sheets.access_token, "SHEETSYNC_SHEETS_ACCESS_TOKEN");
    override_with(&mut config.erp.url, "SHEETSYNC_ERP_URL");
    if let Some(owner_url) = env_opt("SHEETSYNC_ERP_OWNER_URL") {
        config.erp.owner_url = Some(owner_url);
    }
    override_with(&mut config.ticketing.public_key, "SHEETSYNC_TICKETING_PUBLIC_KEY");
    override_with(&mut config.ticketing.private_key, "SHEETSYNC_TICKETING_PRIVATE_KEY");
    override_with(&mut config.ticketing.client_id, "SHEETSYNC_TICKETING_CLIENT_ID");

    override_carrier(&mut config.carriers.ups, "UPS", UPS_TOKEN_URL, UPS_API_BASE_URL);
    override_carrier(&mut config.carriers.fedex, "FEDEX", FEDEX_TOKEN_URL, FEDEX_API_BASE_URL);

    if let Some(url) = env_opt("SHEETSYNC_NOTIFY_WEBHOOK_URL") {
        config.notification.webhook_url = Some(url);
    }
    if let Some(list) = env_opt("SHEETSYNC_NOTIFY_RECIPIENTS") {
        config.notification.recipients = split_list(&list);
    }
    if let Some(list) = env_opt("SHEETSYNC_NOTIFY_CC") {
        config.notification.cc = split_list(&list);
    }
    if let Some(dir) = env_opt("SHEETSYNC_LOG_DIR") {
        config.logging.directory = Some(dir);
    }
}

fn override_carrier(
    slot: &mut Option<CarrierApiConfig>,
    prefix: &str,
    token_url: &str,
    api_base_url: &str,
) {
    let client_id = env_opt(&format!("SHEETSYNC_{prefix}_CLIENT_ID"));
    let client_secret = env_opt(&format!("SHEETSYNC_{prefix}_CLIENT_SECRET"));
    if let Some(existing) = slot.as_mut() {
        if let Some(id) = client_id {
            existing.client_id = id;
        }
        if let Some(secret) = client_secret {
            existing.client_secret = secret;
        }
        return;
    }
    if let (Some(client_id), Some(client_secret)) = (client_id, client_secret) {
        *slot = Some(CarrierApiConfig {
            token_url: token_url.to_string(),
            api_base_url: api_base_url.to_string(),
            client_id,
            client_secret,
        });
    }
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`find_config_path`].
///
/// # Errors
/// Returns `SheetSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SheetSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            SheetSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SheetSyncError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SheetSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SheetSyncError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SheetSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `SheetSyncError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        SheetSyncError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-blank environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Result<u64> {
    env_var(key).and_then(|s| {
        s.trim()
            .parse::<u64>()
            .map_err(|e| SheetSyncError::Config(format!("Invalid {}: {}", key, e)))
    })
}

fn parse_sheet_ids(raw: &str) -> Result<Vec<u64>> {
    split_list(raw)
        .iter()
        .map(|id| {
            id.parse::<u64>().map_err(|e| {
                SheetSyncError::Config(format!(
                    "Invalid SHEETSYNC_HELPER_SHEET_IDS '{}': {}",
                    id, e
                ))
            })
        })
        .collect()
}

fn override_with(target: &mut String, key: &str) {
    if let Some(value) = env_opt(key) {
        *target = value;
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(ToString::to_string).collect()
}
