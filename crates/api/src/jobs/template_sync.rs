//! Background job that pushes locally saved templates to the database.

use domain::services::template_save::TemplateSaver;
use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_template_sync;

pub struct TemplateSyncJob {
    saver: TemplateSaver,
    interval_secs: u64,
}

impl TemplateSyncJob {
    pub fn new(saver: TemplateSaver, interval_secs: u64) -> Self {
        Self {
            saver,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for TemplateSyncJob {
    fn name(&self) -> &'static str {
        "template_sync"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    /// Templates saved during a previous outage go out as soon as possible.
    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let report = self
            .saver
            .sync_pending(None)
            .await
            .map_err(|e| e.to_string())?;
        record_template_sync(&report);
        persistence::metrics::record_pending_local_templates(report.remaining);

        if report.attempted > 0 {
            info!(
                attempted = report.attempted,
                synced = report.synced,
                failed = report.failed,
                remaining = report.remaining,
                "Local template sync finished"
            );
        }
        Ok(())
    }
}
