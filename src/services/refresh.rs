//! Periodic refresh of the instrument directory.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{info, warn};

use crate::services::sync::MetadataSync;

pub struct InstrumentRefresher {
    sync: MetadataSync,
    schedule: String,
}

impl InstrumentRefresher {
    /// `schedule` is a six-field cron expression (seconds first).
    pub fn new(sync: MetadataSync, schedule: impl Into<String>) -> Self {
        Self {
            sync,
            schedule: schedule.into(),
        }
    }

    /// Starts the job. The returned scheduler must be kept alive.
    pub async fn start(&self) -> Result<JobScheduler, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;
        let sync = self.sync.clone();

        let job = Job::new_async(self.schedule.as_str(), move |_uuid, _l| {
            let sync = sync.clone();
            Box::pin(async move {
                match sync.load_instruments().await {
                    Ok(count) => info!("🔁 [REFRESH] Instrument list refreshed ({} instruments)", count),
                    Err(e) => warn!("⚠️ [REFRESH] Instrument refresh failed: {}", e),
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!("📅 [REFRESH] Instrument refresh scheduled: {}", self.schedule);
        Ok(scheduler)
    }
}
