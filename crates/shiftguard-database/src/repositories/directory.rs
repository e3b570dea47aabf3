//! Directory repository implementation (read-only for this subsystem).

use sqlx::PgPool;
use uuid::Uuid;

use shiftguard_core::error::{AppError, ErrorKind};
use shiftguard_core::result::AppResult;
use shiftguard_entity::directory::model::{Employee, Team};

/// Read access to the employee/team/organization directory.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an employee by ID.
    pub async fn find_employee(&self, id: Uuid) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find employee", e))
    }

    /// Find an employee by ID, or return a not-found error.
    pub async fn get_employee(&self, id: Uuid) -> AppResult<Employee> {
        self.find_employee(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))
    }

    /// Find a team by ID.
    pub async fn find_team(&self, id: Uuid) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find team", e))
    }
}
