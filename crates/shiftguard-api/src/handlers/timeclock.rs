//! Clock-in/clock-out handlers.

use axum::Json;
use axum::extract::State;

use shiftguard_compliance::timeclock::ClockOutResult;
use shiftguard_entity::ledger::model::LedgerEntry;
use shiftguard_entity::period::model::WorkPeriod;

use crate::dto::request::ClockEventRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Response body for a clock-in.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClockInResponse {
    /// The appended ledger entry.
    pub entry: LedgerEntry,
    /// The opened work period.
    pub period: WorkPeriod,
}

/// POST /api/clock/in
pub async fn clock_in(
    State(state): State<AppState>,
    Json(body): Json<ClockEventRequest>,
) -> Result<Json<ApiResponse<ClockInResponse>>, ApiError> {
    let actor = body.actor_id.unwrap_or(body.employee_id);
    let (entry, period) = state
        .timeclock
        .clock_in(body.employee_id, actor, body.timestamp)
        .await?;
    Ok(Json(ApiResponse::ok(ClockInResponse { entry, period })))
}

/// POST /api/clock/out
pub async fn clock_out(
    State(state): State<AppState>,
    Json(body): Json<ClockEventRequest>,
) -> Result<Json<ApiResponse<ClockOutResult>>, ApiError> {
    let actor = body.actor_id.unwrap_or(body.employee_id);
    let result = state
        .timeclock
        .clock_out(body.employee_id, actor, body.timestamp)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}
