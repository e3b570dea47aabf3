//! Compliance violation entity model.
//!
//! Violations are an append-only log; the only permitted mutation is
//! recording an acknowledgment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The kind of limit a violation breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "violation_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Daily worked-minutes cap exceeded.
    MaxDaily,
    /// Weekly worked-minutes cap exceeded.
    MaxWeekly,
    /// Uninterrupted-work cap exceeded.
    MaxUninterrupted,
    /// Required break not taken.
    BreakRequired,
}

/// A recorded breach of a regulation's limits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComplianceViolation {
    /// Unique violation identifier.
    pub id: Uuid,
    /// The employee concerned.
    pub employee_id: Uuid,
    /// The employee's organization.
    pub organization_id: Uuid,
    /// The regulation whose limit was breached.
    pub regulation_id: Uuid,
    /// The work period involved, if the breach is tied to one.
    pub work_period_id: Option<Uuid>,
    /// The calendar day the violation occurred on.
    pub violation_date: NaiveDate,
    /// Which limit was breached.
    pub kind: ViolationKind,
    /// Human-readable details (limit, observed value).
    pub details: String,
    /// Who acknowledged the violation, if anyone.
    pub acknowledged_by: Option<Uuid>,
    /// When the violation was acknowledged.
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a new violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateViolation {
    /// The employee concerned.
    pub employee_id: Uuid,
    /// The employee's organization.
    pub organization_id: Uuid,
    /// The regulation breached.
    pub regulation_id: Uuid,
    /// The work period involved, if any.
    pub work_period_id: Option<Uuid>,
    /// The calendar day of the violation.
    pub violation_date: NaiveDate,
    /// Which limit was breached.
    pub kind: ViolationKind,
    /// Human-readable details.
    pub details: String,
}
