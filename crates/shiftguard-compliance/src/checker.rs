//! Compliance checking for a work session.
//!
//! Daily and weekly cap breaches are hard violations; uninterrupted-work
//! and break-deficit findings are warnings only. The hard splitting of a
//! period happens in the enforcement action, not here.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use shiftguard_core::result::AppResult;
use shiftguard_database::repositories::directory::DirectoryRepository;
use shiftguard_database::repositories::violation::ViolationRepository;
use shiftguard_entity::regulation::model::Regulation;
use shiftguard_entity::violation::model::{CreateViolation, ViolationKind};

use crate::calendar;
use crate::deficit::{BreakDeficit, break_deficit};
use crate::resolver::RegulationResolver;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory; does not make the session non-compliant.
    Warning,
    /// A hard breach of the regulation.
    Violation,
}

/// One finding from a compliance evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Which limit the finding concerns.
    pub kind: ViolationKind,
    /// Warning or hard violation.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

/// The result of evaluating one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// True iff there are zero violation-severity findings.
    pub is_compliant: bool,
    /// All findings, hard and advisory.
    pub findings: Vec<Finding>,
    /// The break requirement evaluated, when a regulation applied.
    pub break_requirement: Option<BreakDeficit>,
}

impl ComplianceReport {
    /// A report for an employee with no regulation in force.
    pub fn unregulated() -> Self {
        Self {
            is_compliant: true,
            findings: Vec::new(),
            break_requirement: None,
        }
    }
}

/// Evaluate a session against a regulation. Pure, no I/O.
pub fn evaluate(
    regulation: &Regulation,
    current_session_minutes: i32,
    total_daily_minutes: i32,
    total_weekly_minutes: i32,
    breaks_taken_minutes: i32,
) -> ComplianceReport {
    let mut findings = Vec::new();

    if let Some(max_daily) = regulation.max_daily_minutes {
        if total_daily_minutes > max_daily {
            findings.push(Finding {
                kind: ViolationKind::MaxDaily,
                severity: Severity::Violation,
                message: format!(
                    "Daily limit exceeded: {total_daily_minutes} min worked, {max_daily} min allowed"
                ),
            });
        }
    }

    if let Some(max_weekly) = regulation.max_weekly_minutes {
        if total_weekly_minutes > max_weekly {
            findings.push(Finding {
                kind: ViolationKind::MaxWeekly,
                severity: Severity::Violation,
                message: format!(
                    "Weekly limit exceeded: {total_weekly_minutes} min worked, {max_weekly} min allowed"
                ),
            });
        }
    }

    if let Some(max_uninterrupted) = regulation.max_uninterrupted_minutes {
        if current_session_minutes > max_uninterrupted {
            findings.push(Finding {
                kind: ViolationKind::MaxUninterrupted,
                severity: Severity::Warning,
                message: format!(
                    "Uninterrupted work of {current_session_minutes} min exceeds the {max_uninterrupted} min cap"
                ),
            });
        }
    }

    let requirement = break_deficit(regulation, current_session_minutes, breaks_taken_minutes);
    if requirement.is_owed() {
        let required = requirement
            .applicable_rule
            .as_ref()
            .map(|r| r.required_break_minutes)
            .unwrap_or(0);
        findings.push(Finding {
            kind: ViolationKind::BreakRequired,
            severity: Severity::Warning,
            message: format!(
                "Break deficit: {} of {required} required break minutes still owed",
                requirement.deficit_minutes
            ),
        });
    }

    ComplianceReport {
        is_compliant: !findings.iter().any(|f| f.severity == Severity::Violation),
        findings,
        break_requirement: Some(requirement),
    }
}

/// Evaluates sessions and records hard violations.
#[derive(Debug, Clone)]
pub struct ComplianceChecker {
    resolver: Arc<RegulationResolver>,
    directory: Arc<DirectoryRepository>,
    violations: Arc<ViolationRepository>,
}

impl ComplianceChecker {
    /// Create a new compliance checker.
    pub fn new(
        resolver: Arc<RegulationResolver>,
        directory: Arc<DirectoryRepository>,
        violations: Arc<ViolationRepository>,
    ) -> Self {
        Self {
            resolver,
            directory,
            violations,
        }
    }

    /// Check a session for an employee, recording any hard violations.
    ///
    /// Employees with no regulation in force are always compliant.
    pub async fn check_compliance(
        &self,
        employee_id: Uuid,
        work_period_id: Option<Uuid>,
        current_session_minutes: i32,
        total_daily_minutes: i32,
        total_weekly_minutes: i32,
        breaks_taken_minutes: i32,
    ) -> AppResult<ComplianceReport> {
        let Some(effective) = self.resolver.effective_regulation(employee_id).await? else {
            return Ok(ComplianceReport::unregulated());
        };

        let report = evaluate(
            &effective.regulation,
            current_session_minutes,
            total_daily_minutes,
            total_weekly_minutes,
            breaks_taken_minutes,
        );

        // Persist hard violations; a failed write downgrades to a log line
        // rather than failing the check itself.
        let employee = self.directory.get_employee(employee_id).await?;
        let tz = calendar::parse_timezone(&employee.timezone);
        let today = calendar::local_date(tz, Utc::now());

        for finding in report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Violation)
        {
            let record = CreateViolation {
                employee_id,
                organization_id: employee.organization_id,
                regulation_id: effective.regulation.id,
                work_period_id,
                violation_date: today,
                kind: finding.kind,
                details: finding.message.clone(),
            };
            if let Err(e) = self.violations.create(&record).await {
                warn!(
                    employee_id = %employee_id,
                    error = %e,
                    "Failed to persist compliance violation"
                );
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftguard_entity::regulation::model::BreakRule;
    use sqlx::types::Json;

    fn regulation() -> Regulation {
        Regulation {
            id: Uuid::new_v4(),
            name: "Test regulation".to_string(),
            max_daily_minutes: Some(600),
            max_weekly_minutes: Some(2880),
            max_uninterrupted_minutes: Some(360),
            break_rules: Json(vec![BreakRule {
                working_minutes_threshold: 360,
                required_break_minutes: 30,
                options: Vec::new(),
            }]),
        }
    }

    #[test]
    fn test_clean_session_is_compliant() {
        let report = evaluate(&regulation(), 300, 300, 1200, 0);
        assert!(report.is_compliant);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_daily_cap_breach_is_violation() {
        let report = evaluate(&regulation(), 300, 700, 1200, 60);
        assert!(!report.is_compliant);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, ViolationKind::MaxDaily);
        assert_eq!(report.findings[0].severity, Severity::Violation);
    }

    #[test]
    fn test_weekly_cap_breach_is_violation() {
        let report = evaluate(&regulation(), 300, 500, 3000, 60);
        assert!(!report.is_compliant);
        assert_eq!(report.findings[0].kind, ViolationKind::MaxWeekly);
    }

    #[test]
    fn test_warnings_alone_keep_session_compliant() {
        // Long uninterrupted session with a break deficit, but below the
        // daily and weekly caps: soft findings only.
        let report = evaluate(&regulation(), 420, 420, 1200, 0);
        assert!(report.is_compliant);
        assert_eq!(report.findings.len(), 2);
        assert!(
            report
                .findings
                .iter()
                .all(|f| f.severity == Severity::Warning)
        );
        let requirement = report.break_requirement.unwrap();
        assert_eq!(requirement.deficit_minutes, 30);
    }

    #[test]
    fn test_findings_are_evaluated_independently() {
        // Everything at once: two violations plus two warnings.
        let report = evaluate(&regulation(), 700, 700, 3000, 0);
        assert!(!report.is_compliant);
        assert_eq!(report.findings.len(), 4);
    }
}
