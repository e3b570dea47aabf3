//! Automatic break enforcement.
//!
//! Splits a closed work period in two to carve out a compliant break,
//! writing two synthetic ledger entries and preserving the pre-adjustment
//! values for audit. This is the only place in the system that rewrites a
//! closed period's boundaries, and every rewrite is reconstructable from
//! `auto_adjustment_reason` plus the `original_*` columns.
//!
//! Per invocation all writes share one transaction holding a row lock on
//! the period, so a partial split is never visible and concurrent
//! invocations for the same period serialize behind the lock, where the
//! second one hits the idempotence guard.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use shiftguard_core::error::{AppError, ErrorKind};
use shiftguard_core::result::AppResult;
use shiftguard_database::repositories::directory::DirectoryRepository;
use shiftguard_database::repositories::ledger::LedgerRepository;
use shiftguard_database::repositories::period::{SecondHalfInsert, WorkPeriodRepository};
use shiftguard_entity::ledger::model::{ClockEventKind, CreateLedgerEntry};

use crate::calendar;
use crate::deficit::{break_deficit, breaks_taken_minutes};
use crate::resolver::RegulationResolver;

/// Note attached to the synthetic ledger entries of an inserted break.
const SYNTHETIC_ENTRY_NOTE: &str = "Automatic break insertion (compliance enforcement)";

/// A computed break insertion point for a period split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInsertion {
    /// Minutes into the period where the break starts.
    pub offset_minutes: i64,
    /// When the inserted break starts (first half ends).
    pub break_start: DateTime<Utc>,
    /// When the inserted break ends (second half starts).
    pub break_end: DateTime<Utc>,
    /// Length of the inserted break.
    pub break_minutes: i32,
}

/// Choose where to insert a break of `deficit_minutes` into a period.
///
/// The insertion offset is the uninterrupted-work cap bounded by the rule's
/// threshold (the threshold alone when no cap is set). Both break endpoints
/// must fall strictly inside the period; otherwise the period is too short
/// to host the break and `None` is returned — the engine never shortens or
/// extends the employee's actual worked span.
pub fn plan_break_insertion(
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    deficit_minutes: i32,
    rule_threshold_minutes: i32,
    max_uninterrupted_minutes: Option<i32>,
) -> Option<BreakInsertion> {
    if deficit_minutes <= 0 {
        return None;
    }

    let offset_minutes = max_uninterrupted_minutes
        .map(|cap| cap.min(rule_threshold_minutes))
        .unwrap_or(rule_threshold_minutes) as i64;

    let break_start = period_start + Duration::minutes(offset_minutes);
    let break_end = break_start + Duration::minutes(deficit_minutes as i64);

    if break_start <= period_start || break_end >= period_end {
        return None;
    }

    Some(BreakInsertion {
        offset_minutes,
        break_start,
        break_end,
        break_minutes: deficit_minutes,
    })
}

/// Why a period was left unadjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The period was already adjusted by an earlier invocation.
    AlreadyAdjusted,
    /// The period has not been closed by a clock-out yet.
    PeriodStillOpen,
    /// No regulation is in force for the employee.
    NoRegulation,
    /// The worked time is below every break rule threshold.
    NoApplicableRule,
    /// The required break was already taken.
    NoDeficit,
    /// The break cannot fit strictly inside the period's bounds.
    BreakDoesNotFit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AlreadyAdjusted => "already adjusted",
            Self::PeriodStillOpen => "period still open",
            Self::NoRegulation => "no regulation in force",
            Self::NoApplicableRule => "no applicable break rule",
            Self::NoDeficit => "no break deficit",
            Self::BreakDoesNotFit => "break does not fit inside the period",
        };
        write!(f, "{s}")
    }
}

/// What an enforcement invocation did to a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EnforcementOutcome {
    /// The period was split around an inserted break.
    Adjusted(AdjustmentSummary),
    /// The period was left untouched.
    Skipped {
        /// Why nothing was done.
        reason: SkipReason,
    },
}

impl EnforcementOutcome {
    /// Whether the invocation adjusted the period.
    pub fn was_adjusted(&self) -> bool {
        matches!(self, Self::Adjusted(_))
    }
}

/// The audit summary of an applied adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentSummary {
    /// The period that became the first half.
    pub work_period_id: Uuid,
    /// The newly inserted second-half period.
    pub second_half_period_id: Uuid,
    /// The regulation enforced.
    pub regulation_id: Uuid,
    /// The regulation's name.
    pub regulation_name: String,
    /// The applied rule's worked-minutes threshold.
    pub rule_threshold_minutes: i32,
    /// Length of the inserted break.
    pub break_minutes: i32,
    /// When the inserted break starts.
    pub break_start: DateTime<Utc>,
    /// When the inserted break ends.
    pub break_end: DateTime<Utc>,
    /// The period's duration before the split.
    pub original_duration_minutes: i32,
    /// First-half duration after the split.
    pub first_half_minutes: i32,
    /// Second-half duration after the split.
    pub second_half_minutes: i32,
}

/// A request to enforce break compliance on one closed period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementRequest {
    /// The employee whose period is being checked.
    pub employee_id: Uuid,
    /// The period to check.
    pub work_period_id: Uuid,
    /// The session length in minutes; defaults to the period's duration.
    pub session_duration_minutes: Option<i32>,
    /// Timezone override; defaults to the employee's directory timezone.
    pub timezone: Option<String>,
    /// The actor recorded on the synthetic ledger entries.
    pub actor_id: Uuid,
}

/// Orchestrates the break enforcement state machine for one period.
#[derive(Debug, Clone)]
pub struct BreakEnforcementAction {
    pool: PgPool,
    periods: Arc<WorkPeriodRepository>,
    directory: Arc<DirectoryRepository>,
    resolver: Arc<RegulationResolver>,
}

impl BreakEnforcementAction {
    /// Create a new enforcement action.
    pub fn new(
        pool: PgPool,
        periods: Arc<WorkPeriodRepository>,
        directory: Arc<DirectoryRepository>,
        resolver: Arc<RegulationResolver>,
    ) -> Self {
        Self {
            pool,
            periods,
            directory,
            resolver,
        }
    }

    /// Enforce break compliance on one period.
    ///
    /// Terminal states are idempotent: a period that was already adjusted
    /// is reported as skipped without any writes, so the safety net can
    /// re-run this freely.
    pub async fn enforce(&self, request: &EnforcementRequest) -> AppResult<EnforcementOutcome> {
        let employee = self.directory.get_employee(request.employee_id).await?;
        let tz = calendar::parse_timezone(
            request.timezone.as_deref().unwrap_or(&employee.timezone),
        );

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin enforcement transaction", e)
        })?;

        let period = WorkPeriodRepository::find_by_id_for_update(&mut tx, request.work_period_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Work period {} not found", request.work_period_id))
            })?;

        if period.employee_id != request.employee_id {
            return Err(AppError::validation(
                "Work period does not belong to the given employee",
            ));
        }

        if period.was_auto_adjusted {
            return Ok(EnforcementOutcome::Skipped {
                reason: SkipReason::AlreadyAdjusted,
            });
        }

        let Some(period_end) = period.end_time else {
            return Ok(EnforcementOutcome::Skipped {
                reason: SkipReason::PeriodStillOpen,
            });
        };

        if calendar::crosses_local_midnight(tz, period.start_time, period_end) {
            // Day-boundary break accounting is ambiguous for this session;
            // flagged pending product clarification.
            warn!(
                work_period_id = %period.id,
                employee_id = %period.employee_id,
                "Work period straddles local midnight; break accounting uses the start day"
            );
        }

        // Breaks already taken today, in the employee's local day.
        let (day_start, day_end) = calendar::day_window_containing(tz, period.start_time);
        let day_periods = self
            .periods
            .closed_in_window(period.employee_id, day_start, day_end)
            .await?;
        let breaks_taken = breaks_taken_minutes(&day_periods) as i32;

        let worked_minutes = request
            .session_duration_minutes
            .or(period.duration_minutes)
            .or_else(|| period.closed_duration_minutes())
            .unwrap_or(0);

        let Some(effective) = self
            .resolver
            .effective_regulation(request.employee_id)
            .await?
        else {
            return Ok(EnforcementOutcome::Skipped {
                reason: SkipReason::NoRegulation,
            });
        };

        let deficit = break_deficit(&effective.regulation, worked_minutes, breaks_taken);
        let Some(rule) = deficit.applicable_rule.as_ref() else {
            return Ok(EnforcementOutcome::Skipped {
                reason: SkipReason::NoApplicableRule,
            });
        };
        if !deficit.is_owed() {
            return Ok(EnforcementOutcome::Skipped {
                reason: SkipReason::NoDeficit,
            });
        }

        let Some(insertion) = plan_break_insertion(
            period.start_time,
            period_end,
            deficit.deficit_minutes,
            rule.working_minutes_threshold,
            deficit.max_uninterrupted_minutes,
        ) else {
            info!(
                work_period_id = %period.id,
                deficit_minutes = deficit.deficit_minutes,
                "Break does not fit inside the period, leaving it untouched"
            );
            return Ok(EnforcementOutcome::Skipped {
                reason: SkipReason::BreakDoesNotFit,
            });
        };

        // Synthetic clock events bounding the inserted break.
        let break_out = LedgerRepository::append_with(
            &mut tx,
            &CreateLedgerEntry {
                employee_id: period.employee_id,
                kind: ClockEventKind::ClockOut,
                timestamp: insertion.break_start,
                created_by: request.actor_id,
                note: Some(SYNTHETIC_ENTRY_NOTE.to_string()),
            },
        )
        .await?;
        let break_in = LedgerRepository::append_with(
            &mut tx,
            &CreateLedgerEntry {
                employee_id: period.employee_id,
                kind: ClockEventKind::ClockIn,
                timestamp: insertion.break_end,
                created_by: request.actor_id,
                note: Some(SYNTHETIC_ENTRY_NOTE.to_string()),
            },
        )
        .await?;

        let original_duration = period
            .duration_minutes
            .or_else(|| period.closed_duration_minutes())
            .unwrap_or(0);
        let first_half_minutes = (insertion.break_start - period.start_time).num_minutes() as i32;
        let second_half_minutes = (period_end - insertion.break_end).num_minutes() as i32;
        let adjusted_at = Utc::now();

        let reason = serde_json::json!({
            "regulation_id": effective.regulation.id,
            "regulation_name": effective.regulation.name,
            "assigned_via": effective.assigned_via,
            "rule_threshold_minutes": rule.working_minutes_threshold,
            "required_break_minutes": rule.required_break_minutes,
            "deficit_minutes": deficit.deficit_minutes,
            "break_start": insertion.break_start,
            "break_end": insertion.break_end,
            "original_duration_minutes": original_duration,
            "adjusted_duration_minutes": first_half_minutes,
        });

        WorkPeriodRepository::record_split_first_half(
            &mut tx,
            period.id,
            break_out.id,
            insertion.break_start,
            first_half_minutes,
            &reason,
            period_end,
            original_duration,
            adjusted_at,
        )
        .await?;

        let second_half = WorkPeriodRepository::insert_second_half(
            &mut tx,
            &SecondHalfInsert {
                employee_id: period.employee_id,
                organization_id: period.organization_id,
                clock_in_entry_id: break_in.id,
                clock_out_entry_id: period.clock_out_entry_id,
                start_time: insertion.break_end,
                end_time: period_end,
                duration_minutes: second_half_minutes,
                auto_adjustment_reason: reason.clone(),
                auto_adjusted_at: adjusted_at,
            },
        )
        .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit enforcement transaction", e)
        })?;

        info!(
            work_period_id = %period.id,
            second_half_id = %second_half.id,
            break_out_entry = %break_out.id,
            break_in_entry = %break_in.id,
            break_minutes = insertion.break_minutes,
            regulation = %effective.regulation.name,
            "Inserted compliance break into work period"
        );

        Ok(EnforcementOutcome::Adjusted(AdjustmentSummary {
            work_period_id: period.id,
            second_half_period_id: second_half.id,
            regulation_id: effective.regulation.id,
            regulation_name: effective.regulation.name,
            rule_threshold_minutes: rule.working_minutes_threshold,
            break_minutes: insertion.break_minutes,
            break_start: insertion.break_start,
            break_end: insertion.break_end,
            original_duration_minutes: original_duration,
            first_half_minutes,
            second_half_minutes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, h, m, 0).unwrap()
    }

    #[test]
    fn test_insertion_at_capped_offset() {
        // 7h period, 30 min deficit, cap and threshold both at 6h.
        let plan = plan_break_insertion(ts(8, 0), ts(15, 0), 30, 360, Some(360)).unwrap();
        assert_eq!(plan.offset_minutes, 360);
        assert_eq!(plan.break_start, ts(14, 0));
        assert_eq!(plan.break_end, ts(14, 30));
        assert_eq!(plan.break_minutes, 30);
    }

    #[test]
    fn test_offset_is_min_of_cap_and_threshold() {
        let plan = plan_break_insertion(ts(8, 0), ts(16, 0), 30, 360, Some(300)).unwrap();
        assert_eq!(plan.offset_minutes, 300);
        let plan = plan_break_insertion(ts(8, 0), ts(16, 0), 30, 300, Some(360)).unwrap();
        assert_eq!(plan.offset_minutes, 300);
    }

    #[test]
    fn test_threshold_alone_when_no_cap() {
        let plan = plan_break_insertion(ts(8, 0), ts(16, 0), 30, 360, None).unwrap();
        assert_eq!(plan.offset_minutes, 360);
    }

    #[test]
    fn test_break_must_end_strictly_inside_period() {
        // Period ends 380 min in; break would span minutes 360-390.
        assert!(plan_break_insertion(ts(8, 0), ts(14, 20), 30, 360, Some(360)).is_none());
        // Exactly at the boundary is also rejected.
        assert!(plan_break_insertion(ts(8, 0), ts(14, 30), 30, 360, Some(360)).is_none());
        // One minute of slack is enough.
        assert!(plan_break_insertion(ts(8, 0), ts(14, 31), 30, 360, Some(360)).is_some());
    }

    #[test]
    fn test_break_must_start_strictly_inside_period() {
        // Offset lands on the period start.
        assert!(plan_break_insertion(ts(8, 0), ts(10, 0), 10, 0, Some(0)).is_none());
    }

    #[test]
    fn test_zero_deficit_never_plans() {
        assert!(plan_break_insertion(ts(8, 0), ts(16, 0), 0, 360, Some(360)).is_none());
        assert!(plan_break_insertion(ts(8, 0), ts(16, 0), -5, 360, Some(360)).is_none());
    }

    #[test]
    fn test_split_halves_stay_inside_original_bounds() {
        let start = ts(8, 0);
        let end = ts(15, 0);
        for deficit in 1..=60 {
            if let Some(plan) = plan_break_insertion(start, end, deficit, 360, Some(360)) {
                assert!(plan.break_start > start);
                assert!(plan.break_end < end);
                assert!(plan.break_start < plan.break_end);
            }
        }
    }
}
