//! Regulation and assignment repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use shiftguard_core::error::{AppError, ErrorKind};
use shiftguard_core::result::AppResult;
use shiftguard_entity::regulation::assignment::{RegulationAssignment, RegulationScope};
use shiftguard_entity::regulation::model::Regulation;

/// Repository for regulations and their scope assignments.
#[derive(Debug, Clone)]
pub struct RegulationRepository {
    pool: PgPool,
}

impl RegulationRepository {
    /// Create a new regulation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a regulation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Regulation>> {
        sqlx::query_as::<_, Regulation>("SELECT * FROM regulations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find regulation", e)
            })
    }

    /// Active assignments for one scope, newest first.
    ///
    /// The time-window check lives in
    /// `RegulationAssignment::is_effective_at`; callers filter with it.
    pub async fn active_assignments(
        &self,
        scope: RegulationScope,
    ) -> AppResult<Vec<RegulationAssignment>> {
        let (kind, scope_id) = scope.into_parts();

        sqlx::query_as::<_, RegulationAssignment>(
            "SELECT * FROM regulation_assignments \
             WHERE scope_kind = $1 AND scope_id = $2 AND is_active = TRUE \
             ORDER BY created_at DESC",
        )
        .bind(kind)
        .bind(scope_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list regulation assignments", e)
        })
    }
}
