//! Ledger verification handler.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use shiftguard_entity::ledger::chain::{ChainVerification, verify_chain};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/ledger/{employee_id}/verify
///
/// Replays the employee's chain and recomputes every hash from stored
/// fields. A mismatch signals tampering or a missed entry.
pub async fn verify(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ChainVerification>>, ApiError> {
    let entries = state.ledger_repo.chain_for_employee(employee_id).await?;
    Ok(Json(ApiResponse::ok(verify_chain(&entries))))
}
