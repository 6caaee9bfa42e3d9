//! Background job scheduler and job implementations.

mod pool_metrics;
mod scheduler;
mod template_sync;

pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use template_sync::TemplateSyncJob;
