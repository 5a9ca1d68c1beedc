//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sheetsync_core::{
    retry_policy, CarrierTracker, ClearHelperSheetsJob, Clock, ErpRepository, FailureDigest,
    JobRunner, Notifier, ReconciliationDriver, RunReport, Schedule, SerialNumberJob, SheetStore,
    SyncJob, SystemClock, TicketDataJob, TicketingApi, TrackingJob,
};
use sheetsync_domain::{AppConfig, Result, SheetSyncError};
use sheetsync_infra::{
    configured_trackers, notifier_for, ConnectWiseClient, HttpClient, PostgresErpRepository,
    SmartsheetClient,
};
use tracing::{error, info};

use crate::plan::JobPlan;

/// Port implementations the jobs run against.
pub struct Adapters {
    pub store: Arc<dyn SheetStore>,
    pub erp: Arc<dyn ErpRepository>,
    pub ticketing: Arc<dyn TicketingApi>,
    pub trackers: Vec<Arc<dyn CarrierTracker>>,
    pub notifier: Arc<dyn Notifier>,
}

/// Application context - holds configuration and every job dependency
pub struct AppContext {
    pub config: AppConfig,
    pub schedule: Schedule,
    driver: Arc<ReconciliationDriver>,
    erp: Arc<dyn ErpRepository>,
    ticketing: Arc<dyn TicketingApi>,
    trackers: Vec<Arc<dyn CarrierTracker>>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    pub fn new(config: AppConfig, adapters: Adapters) -> Result<Self> {
        let schedule = Schedule::from_config(&config.schedule)?;
        let driver = ReconciliationDriver::new(adapters.store, retry_policy(&config.retry)?);
        Ok(Self {
            config,
            schedule,
            driver: Arc::new(driver),
            erp: adapters.erp,
            ticketing: adapters.ticketing,
            trackers: adapters.trackers,
            notifier: adapters.notifier,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the driver, e.g. with one that does not sleep between retries.
    pub fn with_driver(mut self, driver: ReconciliationDriver) -> Self {
        self.driver = Arc::new(driver);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn plan(&self, now: DateTime<Utc>) -> Result<JobPlan> {
        JobPlan::for_time(&self.schedule, &self.config.sheets, now)
    }

    /// Jobs for `plan`: serial numbers, then ticket data, then the helper
    /// sheets, then each due tracking sheet.
    pub fn jobs(&self, plan: &JobPlan) -> Vec<Arc<dyn SyncJob>> {
        let sheets = &self.config.sheets;
        let mut jobs: Vec<Arc<dyn SyncJob>> = Vec::new();
        if plan.main_jobs {
            jobs.push(Arc::new(SerialNumberJob::new(
                self.driver.clone(),
                self.erp.clone(),
                sheets.order_sheet_id,
                self.config.erp.configuration_queues.clone(),
                sheets.order_columns.clone(),
            )));
            jobs.push(Arc::new(TicketDataJob::new(
                self.driver.clone(),
                self.erp.clone(),
                self.ticketing.clone(),
                self.clock.clone(),
                self.schedule.timezone(),
                sheets.order_sheet_id,
                sheets.escalation_sheet_id,
                sheets.escalation_ticket_column.clone(),
                sheets.order_columns.clone(),
            )));
        }
        if !plan.helper_sheets.is_empty() {
            jobs.push(Arc::new(ClearHelperSheetsJob::new(
                self.driver.clone(),
                plan.helper_sheets.clone(),
            )));
        }
        for sheet in &plan.tracking {
            jobs.push(Arc::new(TrackingJob::new(
                self.driver.clone(),
                self.erp.clone(),
                self.trackers.clone(),
                sheet.clone(),
            )));
        }
        jobs
    }

    pub fn runner(&self) -> JobRunner {
        JobRunner::new(self.notifier.clone(), self.config.notification.clone())
    }

    /// Run every job `plan` names and send the failure report.
    pub async fn run_plan(&self, plan: &JobPlan) -> RunReport {
        if plan.is_empty() {
            info!("No jobs scheduled at this time");
            return RunReport::default();
        }
        self.runner().run_and_report(&self.jobs(plan)).await
    }
}

/// Connect the production adapters and run the jobs due at `now`.
///
/// An ERP connection failure fails every planned job at setup; it is
/// reported like any other job failure.
pub async fn run(config: AppConfig, now: DateTime<Utc>) -> Result<RunReport> {
    let schedule = Schedule::from_config(&config.schedule)?;
    let plan = JobPlan::for_time(&schedule, &config.sheets, now)?;
    if plan.is_empty() {
        info!(local_time = %schedule.local_time(now), "No jobs scheduled at this time");
        return Ok(RunReport::default());
    }

    let http = HttpClient::builder()
        .timeout(Duration::from_secs(config.sheets.request_timeout_secs))
        .build()?;
    let notifier = notifier_for(&config.notification, &http)?;

    let erp = match PostgresErpRepository::connect(&config.erp).await {
        Ok(erp) => Arc::new(erp),
        Err(err) => {
            error!(error = %err, "ERP connection failed");
            let runner = JobRunner::new(notifier, config.notification.clone());
            return Ok(report_setup_failure(&runner, &plan, &err).await);
        }
    };

    let adapters = Adapters {
        store: Arc::new(SmartsheetClient::new(&config.sheets)?),
        erp,
        ticketing: Arc::new(ConnectWiseClient::new(&config.ticketing)?),
        trackers: configured_trackers(&config.carriers, &http),
        notifier,
    };
    let context = AppContext::new(config, adapters)?;
    Ok(context.run_plan(&plan).await)
}

/// Fail every planned job with `err` and send the report.
pub async fn report_setup_failure(
    runner: &JobRunner,
    plan: &JobPlan,
    err: &SheetSyncError,
) -> RunReport {
    let mut digest = FailureDigest::new();
    let labels = plan.labels();
    for label in &labels {
        digest.push(label, err);
    }
    if let Err(e) = runner.notify_failures(&digest).await {
        error!(error = %e, "Run failures could not be reported");
    }
    RunReport { completed: Vec::new(), failed: labels, digest }
}
