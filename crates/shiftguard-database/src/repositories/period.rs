//! Work period repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use shiftguard_core::error::{AppError, ErrorKind};
use shiftguard_core::result::AppResult;
use shiftguard_entity::period::model::{OpenWorkPeriod, WorkPeriod};

/// Parameters for inserting the second half of a split period.
#[derive(Debug, Clone)]
pub struct SecondHalfInsert {
    /// The employee who worked the period.
    pub employee_id: Uuid,
    /// The employee's organization.
    pub organization_id: Uuid,
    /// The synthetic clock-in entry that opens the second half.
    pub clock_in_entry_id: Uuid,
    /// The original clock-out entry that still closes it.
    pub clock_out_entry_id: Option<Uuid>,
    /// Second-half start (end of the inserted break).
    pub start_time: DateTime<Utc>,
    /// Second-half end (the original period end).
    pub end_time: DateTime<Utc>,
    /// Second-half duration in minutes.
    pub duration_minutes: i32,
    /// The shared adjustment record.
    pub auto_adjustment_reason: serde_json::Value,
    /// When the adjustment was applied.
    pub auto_adjusted_at: DateTime<Utc>,
}

/// Repository for work periods.
#[derive(Debug, Clone)]
pub struct WorkPeriodRepository {
    pool: PgPool,
}

impl WorkPeriodRepository {
    /// Create a new work period repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a new period on clock-in.
    pub async fn open(&self, data: &OpenWorkPeriod) -> AppResult<WorkPeriod> {
        sqlx::query_as::<_, WorkPeriod>(
            "INSERT INTO work_periods \
             (employee_id, organization_id, clock_in_entry_id, start_time, is_active) \
             VALUES ($1, $2, $3, $4, TRUE) RETURNING *",
        )
        .bind(data.employee_id)
        .bind(data.organization_id)
        .bind(data.clock_in_entry_id)
        .bind(data.start_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to open work period", e))
    }

    /// Close a period on clock-out, computing its duration.
    pub async fn close(
        &self,
        id: Uuid,
        clock_out_entry_id: Uuid,
        end_time: DateTime<Utc>,
    ) -> AppResult<WorkPeriod> {
        sqlx::query_as::<_, WorkPeriod>(
            "UPDATE work_periods SET \
             clock_out_entry_id = $2, \
             end_time = $3, \
             duration_minutes = (EXTRACT(EPOCH FROM ($3 - start_time)) / 60)::INT, \
             is_active = FALSE \
             WHERE id = $1 AND is_active = TRUE RETURNING *",
        )
        .bind(id)
        .bind(clock_out_entry_id)
        .bind(end_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close work period", e))?
        .ok_or_else(|| AppError::conflict("Work period is not open"))
    }

    /// Find a period by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<WorkPeriod>> {
        sqlx::query_as::<_, WorkPeriod>("SELECT * FROM work_periods WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find work period", e)
            })
    }

    /// Find a period by ID with a row lock, inside an enclosing transaction.
    ///
    /// The enforcement action holds this lock across the whole split so two
    /// concurrent invocations for the same period cannot both pass the
    /// idempotence guard.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<WorkPeriod>> {
        sqlx::query_as::<_, WorkPeriod>("SELECT * FROM work_periods WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock work period", e)
            })
    }

    /// Find an employee's currently open period, if any.
    pub async fn find_active_by_employee(&self, employee_id: Uuid) -> AppResult<Option<WorkPeriod>> {
        sqlx::query_as::<_, WorkPeriod>(
            "SELECT * FROM work_periods WHERE employee_id = $1 AND is_active = TRUE \
             ORDER BY start_time DESC LIMIT 1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active period", e))
    }

    /// Closed periods for an employee whose start falls in `[from, to)`,
    /// ordered by start time. Used for break-gap computation.
    pub async fn closed_in_window(
        &self,
        employee_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<WorkPeriod>> {
        sqlx::query_as::<_, WorkPeriod>(
            "SELECT * FROM work_periods \
             WHERE employee_id = $1 AND is_active = FALSE AND end_time IS NOT NULL \
             AND start_time >= $2 AND start_time < $3 \
             ORDER BY start_time ASC",
        )
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list closed periods", e))
    }

    /// Closed, not-yet-adjusted periods whose start falls in `[from, to)`,
    /// optionally restricted to one organization. The safety net scans these.
    pub async fn unprocessed_in_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        organization_id: Option<Uuid>,
    ) -> AppResult<Vec<WorkPeriod>> {
        let sql = if organization_id.is_some() {
            "SELECT * FROM work_periods \
             WHERE is_active = FALSE AND end_time IS NOT NULL AND was_auto_adjusted = FALSE \
             AND start_time >= $1 AND start_time < $2 AND organization_id = $3 \
             ORDER BY start_time ASC"
        } else {
            "SELECT * FROM work_periods \
             WHERE is_active = FALSE AND end_time IS NOT NULL AND was_auto_adjusted = FALSE \
             AND start_time >= $1 AND start_time < $2 \
             ORDER BY start_time ASC"
        };

        let mut query = sqlx::query_as::<_, WorkPeriod>(sql).bind(from).bind(to);
        if let Some(org) = organization_id {
            query = query.bind(org);
        }

        query.fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list unprocessed periods", e)
        })
    }

    /// Rewrite the original row as the first half of a split.
    ///
    /// The first half is re-bounded by the synthetic clock-out that opens
    /// the inserted break; the original clock-out entry moves to the second
    /// half. Preserves the pre-adjustment end and duration in the
    /// `original_*` columns. Must run inside the enforcement transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_split_first_half(
        conn: &mut PgConnection,
        id: Uuid,
        clock_out_entry_id: Uuid,
        new_end_time: DateTime<Utc>,
        new_duration_minutes: i32,
        reason: &serde_json::Value,
        original_end_time: DateTime<Utc>,
        original_duration_minutes: i32,
        adjusted_at: DateTime<Utc>,
    ) -> AppResult<WorkPeriod> {
        sqlx::query_as::<_, WorkPeriod>(
            "UPDATE work_periods SET \
             clock_out_entry_id = $2, \
             end_time = $3, \
             duration_minutes = $4, \
             was_auto_adjusted = TRUE, \
             auto_adjustment_reason = $5, \
             original_end_time = $6, \
             original_duration_minutes = $7, \
             auto_adjusted_at = $8 \
             WHERE id = $1 AND was_auto_adjusted = FALSE RETURNING *",
        )
        .bind(id)
        .bind(clock_out_entry_id)
        .bind(new_end_time)
        .bind(new_duration_minutes)
        .bind(reason)
        .bind(original_end_time)
        .bind(original_duration_minutes)
        .bind(adjusted_at)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to split work period", e))?
        .ok_or_else(|| AppError::conflict("Work period was already adjusted"))
    }

    /// Insert the second half of a split period.
    ///
    /// The new row is flagged adjusted but carries no `original_*` values:
    /// it has no pre-adjustment state of its own.
    pub async fn insert_second_half(
        conn: &mut PgConnection,
        data: &SecondHalfInsert,
    ) -> AppResult<WorkPeriod> {
        sqlx::query_as::<_, WorkPeriod>(
            "INSERT INTO work_periods \
             (employee_id, organization_id, clock_in_entry_id, clock_out_entry_id, \
              start_time, end_time, duration_minutes, is_active, \
              was_auto_adjusted, auto_adjustment_reason, auto_adjusted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, TRUE, $8, $9) RETURNING *",
        )
        .bind(data.employee_id)
        .bind(data.organization_id)
        .bind(data.clock_in_entry_id)
        .bind(data.clock_out_entry_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.duration_minutes)
        .bind(&data.auto_adjustment_reason)
        .bind(data.auto_adjusted_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert second-half period", e)
        })
    }
}
