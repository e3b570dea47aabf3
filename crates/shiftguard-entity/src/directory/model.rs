//! Directory row models.
//!
//! The directory is maintained by the onboarding workflows upstream; this
//! subsystem only reads it to resolve regulations and day boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An organization (tenant).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Organization display name.
    pub name: String,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// A team within an organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    /// Unique team identifier.
    pub id: Uuid,
    /// The organization this team belongs to.
    pub organization_id: Uuid,
    /// Team display name (used to tag team-scoped regulation hits).
    pub name: String,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// An employee, optionally assigned to a team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: Uuid,
    /// The organization this employee belongs to.
    pub organization_id: Uuid,
    /// The team this employee belongs to, if any.
    pub team_id: Option<Uuid>,
    /// Employee display name.
    pub display_name: String,
    /// IANA timezone the employee works in (e.g., `"Europe/Berlin"`).
    pub timezone: String,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}
