//! Safety-net batch pass over unprocessed periods.
//!
//! The synchronous clock-out trigger can be missed (crash, race, disabled
//! webhook); this pass re-scans a day's closed-but-unadjusted periods and
//! runs the enforcement action on each. Item failures are collected, never
//! propagated — one bad period must not stop the scan. Re-running the pass
//! is safe: the per-period idempotence guard turns repeats into no-ops.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use shiftguard_core::error::{AppError, ErrorKind};
use shiftguard_core::result::AppResult;
use shiftguard_database::repositories::period::WorkPeriodRepository;

use crate::SYSTEM_ACTOR;
use crate::calendar;
use crate::enforcement::{BreakEnforcementAction, EnforcementOutcome, EnforcementRequest};

/// One period that failed during a batch pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// The period that failed.
    pub work_period_id: Uuid,
    /// The failure message.
    pub error: String,
}

/// The result of one safety-net pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// How many periods were examined.
    pub processed_count: usize,
    /// How many of them were adjusted.
    pub adjusted_count: usize,
    /// Per-period failures; the rest of the batch continued past them.
    pub errors: Vec<BatchError>,
}

impl BatchSummary {
    /// Fold one period's result into the summary.
    pub fn record(&mut self, work_period_id: Uuid, result: &AppResult<EnforcementOutcome>) {
        self.processed_count += 1;
        match result {
            Ok(outcome) if outcome.was_adjusted() => self.adjusted_count += 1,
            Ok(_) => {}
            Err(e) => self.errors.push(BatchError {
                work_period_id,
                error: e.to_string(),
            }),
        }
    }
}

/// The scheduled corrective pass behind the synchronous trigger.
#[derive(Debug, Clone)]
pub struct SafetyNetProcessor {
    pool: PgPool,
    periods: Arc<WorkPeriodRepository>,
    enforcement: Arc<BreakEnforcementAction>,
    /// Timezone defining the scan day's boundaries.
    default_timezone: String,
}

impl SafetyNetProcessor {
    /// Create a new safety-net processor.
    pub fn new(
        pool: PgPool,
        periods: Arc<WorkPeriodRepository>,
        enforcement: Arc<BreakEnforcementAction>,
        default_timezone: String,
    ) -> Self {
        Self {
            pool,
            periods,
            enforcement,
            default_timezone,
        }
    }

    /// Run the pass over one day's unprocessed periods.
    ///
    /// Defaults to today in the configured timezone, optionally restricted
    /// to one organization. An advisory lock keyed by the
    /// `(organization, date)` window rejects a concurrent pass over the
    /// same window with a conflict error.
    pub async fn process_unprocessed_periods(
        &self,
        organization_id: Option<Uuid>,
        date: Option<NaiveDate>,
    ) -> AppResult<BatchSummary> {
        let tz = calendar::parse_timezone(&self.default_timezone);
        let date = date.unwrap_or_else(|| calendar::local_date(tz, Utc::now()));
        let (from, to) = calendar::day_window(tz, date);

        // Held until the pass finishes; a second pass over the same window
        // bails out instead of racing this one.
        let mut lock_tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin batch lock", e)
        })?;
        let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
            .bind(batch_lock_key(organization_id, date))
            .fetch_one(&mut *lock_tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to acquire batch lock", e)
            })?;
        if !locked {
            return Err(AppError::conflict(format!(
                "A safety-net pass for {date} is already running"
            )));
        }

        let candidates = self
            .periods
            .unprocessed_in_window(from, to, organization_id)
            .await?;
        info!(
            date = %date,
            organization_id = ?organization_id,
            candidates = candidates.len(),
            "Starting safety-net enforcement pass"
        );

        let mut summary = BatchSummary::default();
        for period in &candidates {
            let request = EnforcementRequest {
                employee_id: period.employee_id,
                work_period_id: period.id,
                session_duration_minutes: period.duration_minutes,
                timezone: None,
                actor_id: SYSTEM_ACTOR,
            };
            let result = self.enforcement.enforce(&request).await;
            if let Err(e) = &result {
                warn!(
                    work_period_id = %period.id,
                    error = %e,
                    "Safety-net enforcement failed for period, continuing"
                );
            }
            summary.record(period.id, &result);
        }

        lock_tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to release batch lock", e)
        })?;

        info!(
            processed = summary.processed_count,
            adjusted = summary.adjusted_count,
            failed = summary.errors.len(),
            "Safety-net enforcement pass finished"
        );
        Ok(summary)
    }
}

/// Advisory lock key for one `(organization, date)` scan window.
fn batch_lock_key(organization_id: Option<Uuid>, date: NaiveDate) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(b"shiftguard.safety_net|");
    match organization_id {
        Some(id) => hasher.update(id.as_bytes()),
        None => hasher.update(b"all"),
    }
    hasher.update(b"|");
    hasher.update(date.to_string().as_bytes());
    let digest = hasher.finalize();
    i64::from_be_bytes(digest[..8].try_into().expect("digest is long enough"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftguard_core::AppError;

    use crate::enforcement::SkipReason;

    #[test]
    fn test_summary_counts_adjusted_skipped_and_failed() {
        let mut summary = BatchSummary::default();
        let failing_id = Uuid::new_v4();

        summary.record(
            Uuid::new_v4(),
            &Ok(EnforcementOutcome::Skipped {
                reason: SkipReason::NoDeficit,
            }),
        );
        summary.record(failing_id, &Err(AppError::database("connection reset")));

        assert_eq!(summary.processed_count, 2);
        assert_eq!(summary.adjusted_count, 0);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].work_period_id, failing_id);
        assert!(summary.errors[0].error.contains("connection reset"));
    }

    #[test]
    fn test_lock_key_varies_by_window() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let next = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        let org = Uuid::new_v4();

        assert_eq!(batch_lock_key(None, date), batch_lock_key(None, date));
        assert_ne!(batch_lock_key(None, date), batch_lock_key(None, next));
        assert_ne!(batch_lock_key(Some(org), date), batch_lock_key(None, date));
    }
}
