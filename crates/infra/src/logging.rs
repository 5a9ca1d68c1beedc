//! Logging setup
//!
//! Console output is filtered by `RUST_LOG` when set, otherwise by the
//! configured console level. When a log directory is configured a second
//! layer writes `<YYYY-MM-DD>.log` there at the file level.

use std::path::Path;

use chrono::NaiveDate;
use sheetsync_domain::{LoggingConfig, Result, SheetSyncError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Log file name for a run on `date`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{}.log", date.format("%Y-%m-%d"))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig, today: NaiveDate) -> Result<Option<WorkerGuard>> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.console_level));
    let console = fmt::layer().with_target(false).with_filter(console_filter);

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(dir) => {
            let dir = Path::new(dir);
            std::fs::create_dir_all(dir).map_err(|e| {
                SheetSyncError::Config(format!(
                    "cannot create log directory {}: {e}",
                    dir.display()
                ))
            })?;
            let appender = tracing_appender::rolling::never(dir, log_file_name(today));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(&config.file_level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| SheetSyncError::Internal(format!("logging already initialized: {e}")))?;

    Ok(guard)
}
