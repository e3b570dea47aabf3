//! Ledger entry entity model.
//!
//! Ledger entries are write-once: there is no update or delete path
//! anywhere in the application, and the repository exposes none.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The kind of clock event a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "clock_event_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClockEventKind {
    /// The employee started working.
    ClockIn,
    /// The employee stopped working.
    ClockOut,
}

impl ClockEventKind {
    /// Return the kind as its canonical string form.
    ///
    /// This string participates in the entry hash, so it must never change.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClockIn => "clock_in",
            Self::ClockOut => "clock_out",
        }
    }
}

impl fmt::Display for ClockEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable clock-event ledger entry.
///
/// Entries for one employee form a single linear hash chain: `previous_hash`
/// of entry *n* equals `hash` of the employee's prior entry, or `None` for
/// the first entry. `hash` is a SHA-256 digest over the entry's own fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The employee this clock event belongs to.
    pub employee_id: Uuid,
    /// Whether this is a clock-in or clock-out.
    pub kind: ClockEventKind,
    /// When the clock event occurred.
    pub timestamp: DateTime<Utc>,
    /// SHA-256 digest over `(employee_id, kind, timestamp, previous_hash)`.
    pub hash: String,
    /// Hash of the employee's previous entry, or `None` for the first.
    pub previous_hash: Option<String>,
    /// The actor that recorded the event (employee or system).
    pub created_by: Uuid,
    /// Optional note (synthetic entries carry a system note).
    pub note: Option<String>,
    /// When the row was inserted. Chain order follows this column.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new ledger entry.
///
/// `hash` and `previous_hash` are computed by the repository at append time
/// under the per-employee chain lock; callers never supply them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLedgerEntry {
    /// The employee the event belongs to.
    pub employee_id: Uuid,
    /// The kind of clock event.
    pub kind: ClockEventKind,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The actor recording the event.
    pub created_by: Uuid,
    /// Optional note.
    pub note: Option<String>,
}
