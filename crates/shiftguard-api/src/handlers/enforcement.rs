//! Enforcement trigger handlers (internal).

use axum::Json;
use axum::extract::State;

use shiftguard_compliance::enforcement::EnforcementRequest;
use shiftguard_compliance::safety_net::BatchSummary;

use crate::dto::request::{EnforcementTriggerRequest, SafetyNetTriggerRequest};
use crate::dto::response::{ApiResponse, EnforcementResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/internal/enforcement/run
///
/// The synchronous clock-out trigger. Surfaces failures to the caller but
/// is never a gate on recording attendance; the caller treats errors as
/// "deferred to the safety net".
pub async fn run(
    State(state): State<AppState>,
    Json(body): Json<EnforcementTriggerRequest>,
) -> Result<Json<ApiResponse<EnforcementResponse>>, ApiError> {
    let request = EnforcementRequest {
        employee_id: body.employee_id,
        work_period_id: body.work_period_id,
        session_duration_minutes: body.session_duration_minutes,
        timezone: body.timezone,
        actor_id: body.actor_id,
    };
    let outcome = state.enforcement.enforce(&request).await?;
    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// POST /api/internal/enforcement/safety-net
pub async fn safety_net(
    State(state): State<AppState>,
    Json(body): Json<SafetyNetTriggerRequest>,
) -> Result<Json<ApiResponse<BatchSummary>>, ApiError> {
    let summary = state
        .safety_net
        .process_unprocessed_periods(body.organization_id, body.date)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}
