//! Work period entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One continuous work interval bounded by two ledger entries.
///
/// A period is created open on clock-in and closed on clock-out. The break
/// enforcement action may later split a closed period in two; the original
/// row becomes the first half (with its pre-adjustment values preserved in
/// the `original_*` columns) and a new row is inserted as the second half.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkPeriod {
    /// Unique period identifier.
    pub id: Uuid,
    /// The employee who worked this period.
    pub employee_id: Uuid,
    /// The employee's organization.
    pub organization_id: Uuid,
    /// Ledger entry that opened the period.
    pub clock_in_entry_id: Uuid,
    /// Ledger entry that closed the period (if closed).
    pub clock_out_entry_id: Option<Uuid>,
    /// When the period started.
    pub start_time: DateTime<Utc>,
    /// When the period ended (if closed).
    pub end_time: Option<DateTime<Utc>>,
    /// Closed interval length in minutes.
    pub duration_minutes: Option<i32>,
    /// Whether the period is still open.
    pub is_active: bool,
    /// Whether the enforcement action split or flagged this period.
    pub was_auto_adjusted: bool,
    /// Machine-readable adjustment record (JSON), set when adjusted.
    pub auto_adjustment_reason: Option<serde_json::Value>,
    /// When the adjustment was applied.
    pub auto_adjusted_at: Option<DateTime<Utc>>,
    /// The end time before adjustment (first-half rows only).
    pub original_end_time: Option<DateTime<Utc>>,
    /// The duration before adjustment (first-half rows only).
    pub original_duration_minutes: Option<i32>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Data required to open a new work period on clock-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWorkPeriod {
    /// The employee clocking in.
    pub employee_id: Uuid,
    /// The employee's organization.
    pub organization_id: Uuid,
    /// The ledger entry recording the clock-in.
    pub clock_in_entry_id: Uuid,
    /// When the period starts.
    pub start_time: DateTime<Utc>,
}

impl WorkPeriod {
    /// Length of the closed interval in minutes, if closed.
    pub fn closed_duration_minutes(&self) -> Option<i32> {
        self.end_time
            .map(|end| (end - self.start_time).num_minutes() as i32)
    }
}
