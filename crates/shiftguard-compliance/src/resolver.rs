//! Effective regulation resolution.
//!
//! An employee's regulation comes from the narrowest scope that has an
//! active, time-window-valid assignment: employee override first, then the
//! employee's team, then the organization default. The scopes are tried in
//! that order and the first hit wins; a missing or inactive narrower
//! assignment falls through to the next scope in full.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use shiftguard_core::result::AppResult;
use shiftguard_database::repositories::directory::DirectoryRepository;
use shiftguard_database::repositories::regulation::RegulationRepository;
use shiftguard_entity::directory::model::Employee;
use shiftguard_entity::regulation::assignment::RegulationScope;
use shiftguard_entity::regulation::model::Regulation;

/// A resolved regulation together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRegulation {
    /// The regulation in force.
    pub regulation: Regulation,
    /// The assignment that produced it.
    pub assignment_id: Uuid,
    /// The scope the assignment binds at.
    pub scope: RegulationScope,
    /// Human-readable origin: `"Individual"`, the team name, or
    /// `"Organization Default"`.
    pub assigned_via: String,
}

/// Ordered lookup scopes for an employee, narrowest first.
///
/// Employees without a team skip the team scope entirely.
pub fn scope_chain(employee: &Employee) -> Vec<RegulationScope> {
    let mut chain = vec![RegulationScope::Employee(employee.id)];
    if let Some(team_id) = employee.team_id {
        chain.push(RegulationScope::Team(team_id));
    }
    chain.push(RegulationScope::Organization(employee.organization_id));
    chain
}

/// Resolves the single effective regulation for an employee.
///
/// Stateless: both repositories are plain pool handles, so concurrent
/// resolutions are fully independent reads.
#[derive(Debug, Clone)]
pub struct RegulationResolver {
    directory: Arc<DirectoryRepository>,
    regulations: Arc<RegulationRepository>,
}

impl RegulationResolver {
    /// Create a new resolver.
    pub fn new(directory: Arc<DirectoryRepository>, regulations: Arc<RegulationRepository>) -> Self {
        Self {
            directory,
            regulations,
        }
    }

    /// Find the regulation in force for an employee, if any.
    ///
    /// Returns `None` when no scope in the chain has an effective
    /// assignment; no regulation is then enforced for this employee.
    pub async fn effective_regulation(
        &self,
        employee_id: Uuid,
    ) -> AppResult<Option<EffectiveRegulation>> {
        let employee = self.directory.get_employee(employee_id).await?;
        let now = Utc::now();

        for scope in scope_chain(&employee) {
            let Some(assignment) = self
                .regulations
                .active_assignments(scope)
                .await?
                .into_iter()
                .find(|a| a.is_effective_at(now))
            else {
                continue;
            };

            let Some(regulation) = self
                .regulations
                .find_by_id(assignment.regulation_id)
                .await?
            else {
                // Assignment pointing at a deleted regulation; keep walking.
                debug!(
                    assignment_id = %assignment.id,
                    regulation_id = %assignment.regulation_id,
                    "Assignment references missing regulation, skipping"
                );
                continue;
            };

            let assigned_via = self.describe_scope(scope).await?;
            debug!(
                employee_id = %employee_id,
                regulation = %regulation.name,
                assigned_via = %assigned_via,
                "Resolved effective regulation"
            );

            return Ok(Some(EffectiveRegulation {
                regulation,
                assignment_id: assignment.id,
                scope: assignment.scope(),
                assigned_via,
            }));
        }

        Ok(None)
    }

    async fn describe_scope(&self, scope: RegulationScope) -> AppResult<String> {
        Ok(match scope {
            RegulationScope::Employee(_) => "Individual".to_string(),
            RegulationScope::Team(team_id) => self
                .directory
                .find_team(team_id)
                .await?
                .map(|t| t.name)
                .unwrap_or_else(|| "Team".to_string()),
            RegulationScope::Organization(_) => "Organization Default".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn employee(team_id: Option<Uuid>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            team_id,
            display_name: "Test Employee".to_string(),
            timezone: "UTC".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_scope_chain_narrowest_first() {
        let team_id = Uuid::new_v4();
        let emp = employee(Some(team_id));
        let chain = scope_chain(&emp);
        assert_eq!(
            chain,
            vec![
                RegulationScope::Employee(emp.id),
                RegulationScope::Team(team_id),
                RegulationScope::Organization(emp.organization_id),
            ]
        );
    }

    #[test]
    fn test_scope_chain_without_team() {
        let emp = employee(None);
        let chain = scope_chain(&emp);
        assert_eq!(
            chain,
            vec![
                RegulationScope::Employee(emp.id),
                RegulationScope::Organization(emp.organization_id),
            ]
        );
    }
}
