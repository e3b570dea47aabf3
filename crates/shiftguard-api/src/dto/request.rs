//! Request DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body for `POST /api/clock/in` and `POST /api/clock/out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockEventRequest {
    /// The employee clocking in or out.
    pub employee_id: Uuid,
    /// The acting user; defaults to the employee themself.
    pub actor_id: Option<Uuid>,
    /// Event time; defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body for `POST /api/internal/enforcement/run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementTriggerRequest {
    /// The employee whose period is being checked.
    pub employee_id: Uuid,
    /// The employee's organization (informational, from the caller's event).
    pub organization_id: Option<Uuid>,
    /// The period to check.
    pub work_period_id: Uuid,
    /// Session length in minutes, as observed by the caller.
    pub session_duration_minutes: Option<i32>,
    /// IANA timezone of the session's day boundaries.
    pub timezone: Option<String>,
    /// The actor recorded on synthetic ledger entries.
    pub actor_id: Uuid,
}

/// Body for `POST /api/internal/enforcement/safety-net`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyNetTriggerRequest {
    /// Restrict the pass to one organization.
    pub organization_id: Option<Uuid>,
    /// The day to scan; defaults to today.
    pub date: Option<NaiveDate>,
}

/// Body for `POST /api/compliance/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCheckRequest {
    /// The employee being checked.
    pub employee_id: Uuid,
    /// The period involved, if the check is tied to one.
    pub work_period_id: Option<Uuid>,
    /// Length of the current session in minutes.
    pub current_session_minutes: i32,
    /// Total worked minutes today.
    pub total_daily_minutes: i32,
    /// Total worked minutes this week.
    pub total_weekly_minutes: i32,
    /// Break minutes already taken today.
    pub breaks_taken_minutes: i32,
}

/// Body for `POST /api/violations/{id}/acknowledge`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgeViolationRequest {
    /// Who is acknowledging.
    pub acknowledged_by: Uuid,
}
