//! Regulation assignment model and scope resolution types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The level an assignment binds a regulation at, stored as a column pair
/// `(scope_kind, scope_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "regulation_scope_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// Bound to a whole organization.
    Organization,
    /// Bound to one team.
    Team,
    /// Bound to one employee.
    Employee,
}

/// A scope together with the entity it targets.
///
/// Resolution precedence is strict: `Employee` > `Team` > `Organization`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RegulationScope {
    /// Organization-wide default.
    Organization(Uuid),
    /// Team-level override.
    Team(Uuid),
    /// Individual employee override.
    Employee(Uuid),
}

impl RegulationScope {
    /// Split into the persisted column pair.
    pub fn into_parts(self) -> (ScopeKind, Uuid) {
        match self {
            Self::Organization(id) => (ScopeKind::Organization, id),
            Self::Team(id) => (ScopeKind::Team, id),
            Self::Employee(id) => (ScopeKind::Employee, id),
        }
    }
}

/// A binding of a regulation to an organization, team, or employee.
///
/// Multiple assignments may exist concurrently at different scopes;
/// resolution picks the narrowest scope with an active, time-window-valid
/// assignment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegulationAssignment {
    /// Unique assignment identifier.
    pub id: Uuid,
    /// The regulation being assigned.
    pub regulation_id: Uuid,
    /// The level this assignment binds at.
    pub scope_kind: ScopeKind,
    /// The organization, team, or employee targeted.
    pub scope_id: Uuid,
    /// Whether the assignment is administratively active.
    pub is_active: bool,
    /// Start of the validity window, if bounded.
    pub effective_from: Option<DateTime<Utc>>,
    /// End of the validity window, if bounded.
    pub effective_until: Option<DateTime<Utc>>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

impl RegulationAssignment {
    /// The tagged scope this assignment targets.
    pub fn scope(&self) -> RegulationScope {
        match self.scope_kind {
            ScopeKind::Organization => RegulationScope::Organization(self.scope_id),
            ScopeKind::Team => RegulationScope::Team(self.scope_id),
            ScopeKind::Employee => RegulationScope::Employee(self.scope_id),
        }
    }

    /// Whether the assignment is in force at `now`.
    ///
    /// In force means active, `effective_from` unset or at/before `now`,
    /// and `effective_until` unset or at/after `now`.
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(from) = self.effective_from {
            if from > now {
                return false;
            }
        }
        if let Some(until) = self.effective_until {
            if until < now {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assignment(
        is_active: bool,
        effective_from: Option<DateTime<Utc>>,
        effective_until: Option<DateTime<Utc>>,
    ) -> RegulationAssignment {
        RegulationAssignment {
            id: Uuid::new_v4(),
            regulation_id: Uuid::new_v4(),
            scope_kind: ScopeKind::Employee,
            scope_id: Uuid::new_v4(),
            is_active,
            effective_from,
            effective_until,
            created_at: Utc::now(),
        }
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, h, 0, 0).unwrap()
    }

    #[test]
    fn test_unbounded_active_assignment_is_effective() {
        assert!(assignment(true, None, None).is_effective_at(at(12)));
    }

    #[test]
    fn test_inactive_assignment_is_never_effective() {
        assert!(!assignment(false, None, None).is_effective_at(at(12)));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let a = assignment(true, Some(at(9)), Some(at(17)));
        assert!(a.is_effective_at(at(9)));
        assert!(a.is_effective_at(at(17)));
        assert!(!a.is_effective_at(at(8)));
        assert!(!a.is_effective_at(at(18)));
    }

    #[test]
    fn test_scope_round_trip() {
        let scope = RegulationScope::Team(Uuid::new_v4());
        let (kind, id) = scope.into_parts();
        assert_eq!(kind, ScopeKind::Team);
        assert_eq!(RegulationScope::Team(id), scope);
    }
}
