//! Compliance violation repository implementation.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shiftguard_core::error::{AppError, ErrorKind};
use shiftguard_core::result::AppResult;
use shiftguard_entity::violation::model::{ComplianceViolation, CreateViolation};

/// Repository for the compliance violation log.
#[derive(Debug, Clone)]
pub struct ViolationRepository {
    pool: PgPool,
}

impl ViolationRepository {
    /// Create a new violation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a new violation.
    pub async fn create(&self, data: &CreateViolation) -> AppResult<ComplianceViolation> {
        sqlx::query_as::<_, ComplianceViolation>(
            "INSERT INTO compliance_violations \
             (employee_id, organization_id, regulation_id, work_period_id, \
              violation_date, kind, details) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.employee_id)
        .bind(data.organization_id)
        .bind(data.regulation_id)
        .bind(data.work_period_id)
        .bind(data.violation_date)
        .bind(data.kind)
        .bind(&data.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record violation", e))
    }

    /// Find a violation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ComplianceViolation>> {
        sqlx::query_as::<_, ComplianceViolation>(
            "SELECT * FROM compliance_violations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find violation", e))
    }

    /// Record an acknowledgment. The only mutation the log permits.
    pub async fn acknowledge(
        &self,
        id: Uuid,
        acknowledged_by: Uuid,
        acknowledged_at: DateTime<Utc>,
    ) -> AppResult<ComplianceViolation> {
        sqlx::query_as::<_, ComplianceViolation>(
            "UPDATE compliance_violations SET acknowledged_by = $2, acknowledged_at = $3 \
             WHERE id = $1 AND acknowledged_by IS NULL RETURNING *",
        )
        .bind(id)
        .bind(acknowledged_by)
        .bind(acknowledged_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acknowledge violation", e)
        })?
        .ok_or_else(|| AppError::conflict("Violation not found or already acknowledged"))
    }

    /// List an employee's violations on a given day.
    pub async fn list_for_employee_on(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<ComplianceViolation>> {
        sqlx::query_as::<_, ComplianceViolation>(
            "SELECT * FROM compliance_violations \
             WHERE employee_id = $1 AND violation_date = $2 ORDER BY created_at ASC",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list violations", e))
    }
}
