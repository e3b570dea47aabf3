//! Cron scheduler for periodic enforcement tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use shiftguard_core::error::AppError;
use shiftguard_compliance::safety_net::SafetyNetProcessor;

/// Cron-based scheduler for the periodic safety-net pass.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// The safety-net processor to invoke
    safety_net: Arc<SafetyNetProcessor>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(safety_net: Arc<SafetyNetProcessor>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            safety_net,
        })
    }

    /// Register the safety-net pass on the given six-field cron expression.
    ///
    /// Each run scans today's closed-but-unadjusted periods across all
    /// organizations. A run overlapping the previous one is rejected by the
    /// processor's window lock and logged, not retried.
    pub async fn register_safety_net(&self, cron: &str) -> Result<(), AppError> {
        let safety_net = Arc::clone(&self.safety_net);
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let safety_net = Arc::clone(&safety_net);
            Box::pin(async move {
                tracing::debug!("Running scheduled safety-net enforcement pass");
                match safety_net.process_unprocessed_periods(None, None).await {
                    Ok(summary) => {
                        tracing::info!(
                            processed = summary.processed_count,
                            adjusted = summary.adjusted_count,
                            failed = summary.errors.len(),
                            "Scheduled safety-net pass completed"
                        );
                    }
                    Err(e) => {
                        tracing::error!("Scheduled safety-net pass failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create safety-net schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add safety-net schedule: {}", e)))?;

        tracing::info!("Registered: safety_net ({})", cron);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
