//! Time-of-day gating for the main jobs and the tracking passes

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use sheetsync_domain::{Result, ScheduleConfig, SheetSyncError, TrackingSheetConfig};

/// Inclusive window check. A window whose end precedes its start wraps past
/// midnight.
pub fn is_time_between(start: NaiveTime, end: NaiveTime, check: NaiveTime) -> bool {
    if start <= end {
        start <= check && check <= end
    } else {
        check >= start || check <= end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    timezone: Tz,
    main_jobs_cutoff: NaiveTime,
    final_window: (NaiveTime, NaiveTime),
}

impl Schedule {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        let timezone = config.timezone.parse::<Tz>().map_err(|e| {
            SheetSyncError::Config(format!("invalid timezone '{}': {e}", config.timezone))
        })?;
        Ok(Self {
            timezone,
            main_jobs_cutoff: config.main_jobs_cutoff()?,
            final_window: config.final_tracking_window.bounds()?,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveTime {
        now.with_timezone(&self.timezone).time()
    }

    /// Ticket data and serial jobs only run before the cutoff.
    pub fn main_jobs_due(&self, now: DateTime<Utc>) -> bool {
        self.local_time(now) < self.main_jobs_cutoff
    }

    /// Tracking sheets whose own window, or the shared final window,
    /// contains `now`.
    pub fn tracking_due<'a>(
        &self,
        now: DateTime<Utc>,
        sheets: &'a [TrackingSheetConfig],
    ) -> Result<Vec<&'a TrackingSheetConfig>> {
        let local = self.local_time(now);
        let (final_start, final_end) = self.final_window;
        if is_time_between(final_start, final_end, local) {
            return Ok(sheets.iter().collect());
        }

        let mut due = Vec::new();
        for sheet in sheets {
            for window in &sheet.windows {
                let (start, end) = window.bounds()?;
                if is_time_between(start, end, local) {
                    due.push(sheet);
                    break;
                }
            }
        }
        Ok(due)
    }
}
