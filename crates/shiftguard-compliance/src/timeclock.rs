//! Clock-in/clock-out capture.
//!
//! Appends the ledger entry and opens or closes the matching work period.
//! Clock-out additionally triggers the break enforcement action as a
//! best-effort follow-up: enforcement failure is logged and left to the
//! safety net, never surfaced as a clock-out failure — recording
//! attendance is not gated on enforcement.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use shiftguard_core::error::AppError;
use shiftguard_core::result::AppResult;
use shiftguard_database::repositories::directory::DirectoryRepository;
use shiftguard_database::repositories::ledger::LedgerRepository;
use shiftguard_database::repositories::period::WorkPeriodRepository;
use shiftguard_entity::ledger::model::{ClockEventKind, CreateLedgerEntry, LedgerEntry};
use shiftguard_entity::period::model::{OpenWorkPeriod, WorkPeriod};

use crate::enforcement::{BreakEnforcementAction, EnforcementOutcome, EnforcementRequest};

/// The result of a clock-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockOutResult {
    /// The ledger entry recording the clock-out.
    pub entry: LedgerEntry,
    /// The closed work period.
    pub period: WorkPeriod,
    /// What the synchronous enforcement follow-up did, if it ran and
    /// succeeded. `None` means it was disabled or failed (the safety net
    /// will retry).
    pub enforcement: Option<EnforcementOutcome>,
}

/// Clock-event capture service.
#[derive(Debug, Clone)]
pub struct TimeClockService {
    ledger: Arc<LedgerRepository>,
    periods: Arc<WorkPeriodRepository>,
    directory: Arc<DirectoryRepository>,
    enforcement: Arc<BreakEnforcementAction>,
    enforcement_enabled: bool,
}

impl TimeClockService {
    /// Create a new time clock service.
    pub fn new(
        ledger: Arc<LedgerRepository>,
        periods: Arc<WorkPeriodRepository>,
        directory: Arc<DirectoryRepository>,
        enforcement: Arc<BreakEnforcementAction>,
        enforcement_enabled: bool,
    ) -> Self {
        Self {
            ledger,
            periods,
            directory,
            enforcement,
            enforcement_enabled,
        }
    }

    /// Record a clock-in: append the ledger entry and open a period.
    pub async fn clock_in(
        &self,
        employee_id: Uuid,
        actor_id: Uuid,
        timestamp: Option<DateTime<Utc>>,
    ) -> AppResult<(LedgerEntry, WorkPeriod)> {
        let employee = self.directory.get_employee(employee_id).await?;

        if self
            .periods
            .find_active_by_employee(employee_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Employee is already clocked in"));
        }

        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let entry = self
            .ledger
            .append(&CreateLedgerEntry {
                employee_id,
                kind: ClockEventKind::ClockIn,
                timestamp,
                created_by: actor_id,
                note: None,
            })
            .await?;

        let period = self
            .periods
            .open(&OpenWorkPeriod {
                employee_id,
                organization_id: employee.organization_id,
                clock_in_entry_id: entry.id,
                start_time: timestamp,
            })
            .await?;

        Ok((entry, period))
    }

    /// Record a clock-out: append the ledger entry, close the period, then
    /// run enforcement best-effort.
    pub async fn clock_out(
        &self,
        employee_id: Uuid,
        actor_id: Uuid,
        timestamp: Option<DateTime<Utc>>,
    ) -> AppResult<ClockOutResult> {
        let open_period = self
            .periods
            .find_active_by_employee(employee_id)
            .await?
            .ok_or_else(|| AppError::conflict("Employee is not clocked in"))?;

        let timestamp = timestamp.unwrap_or_else(Utc::now);
        if timestamp <= open_period.start_time {
            return Err(AppError::validation(
                "Clock-out must be after the period start",
            ));
        }

        let entry = self
            .ledger
            .append(&CreateLedgerEntry {
                employee_id,
                kind: ClockEventKind::ClockOut,
                timestamp,
                created_by: actor_id,
                note: None,
            })
            .await?;

        let period = self.periods.close(open_period.id, entry.id, timestamp).await?;

        let enforcement = if self.enforcement_enabled {
            let request = EnforcementRequest {
                employee_id,
                work_period_id: period.id,
                session_duration_minutes: period.duration_minutes,
                timezone: None,
                actor_id,
            };
            match self.enforcement.enforce(&request).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(
                        work_period_id = %period.id,
                        error = %e,
                        "Clock-out enforcement failed, deferring to safety net"
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(ClockOutResult {
            entry,
            period,
            enforcement,
        })
    }
}
