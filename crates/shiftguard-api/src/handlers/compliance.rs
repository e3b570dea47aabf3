//! Compliance check handler.

use axum::Json;
use axum::extract::State;

use shiftguard_compliance::checker::ComplianceReport;

use crate::dto::request::ComplianceCheckRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/compliance/check
pub async fn check(
    State(state): State<AppState>,
    Json(body): Json<ComplianceCheckRequest>,
) -> Result<Json<ApiResponse<ComplianceReport>>, ApiError> {
    let report = state
        .checker
        .check_compliance(
            body.employee_id,
            body.work_period_id,
            body.current_session_minutes,
            body.total_daily_minutes,
            body.total_weekly_minutes,
            body.breaks_taken_minutes,
        )
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}
