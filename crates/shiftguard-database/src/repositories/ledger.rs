//! Ledger repository implementation.
//!
//! The ledger is append-only: this repository exposes no update or delete.
//! Appends for one employee are serialized by locking the employee's chain
//! head (`SELECT ... FOR UPDATE`) before computing the next hash, so two
//! concurrent clock events can never link to the same predecessor.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use shiftguard_core::error::{AppError, ErrorKind};
use shiftguard_core::result::AppResult;
use shiftguard_entity::ledger::chain::entry_hash;
use shiftguard_entity::ledger::model::{CreateLedgerEntry, LedgerEntry};

/// Repository for the clock-event ledger.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    /// Create a new ledger repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a new ledger entry in its own transaction.
    pub async fn append(&self, data: &CreateLedgerEntry) -> AppResult<LedgerEntry> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin ledger transaction", e)
        })?;

        let entry = Self::append_with(&mut tx, data).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit ledger append", e)
        })?;

        Ok(entry)
    }

    /// Append a new ledger entry inside an enclosing transaction.
    ///
    /// Locks the employee's latest entry for the duration of the transaction
    /// and computes the new entry's hash against it. Used directly by the
    /// enforcement action so its two synthetic entries join the same
    /// transaction as the period split.
    pub async fn append_with(
        conn: &mut PgConnection,
        data: &CreateLedgerEntry,
    ) -> AppResult<LedgerEntry> {
        let head = sqlx::query_as::<_, LedgerEntry>(
            "SELECT * FROM time_ledger WHERE employee_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1 FOR UPDATE",
        )
        .bind(data.employee_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to lock ledger chain head", e)
        })?;

        let previous_hash = head.map(|h| h.hash);
        let hash = entry_hash(
            data.employee_id,
            data.kind,
            data.timestamp,
            previous_hash.as_deref(),
        );

        sqlx::query_as::<_, LedgerEntry>(
            "INSERT INTO time_ledger \
             (employee_id, kind, timestamp, hash, previous_hash, created_by, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.employee_id)
        .bind(data.kind)
        .bind(data.timestamp)
        .bind(&hash)
        .bind(&previous_hash)
        .bind(data.created_by)
        .bind(&data.note)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append ledger entry", e))
    }

    /// Fetch an employee's full chain in chain order.
    pub async fn chain_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<LedgerEntry>> {
        sqlx::query_as::<_, LedgerEntry>(
            "SELECT * FROM time_ledger WHERE employee_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch ledger chain", e))
    }
}
