//! Violation log handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use shiftguard_entity::violation::model::ComplianceViolation;

use crate::dto::request::AcknowledgeViolationRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for listing violations.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// The day to list; defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

/// GET /api/violations/{employee_id}
pub async fn list(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ComplianceViolation>>>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let violations = state
        .violation_repo
        .list_for_employee_on(employee_id, date)
        .await?;
    Ok(Json(ApiResponse::ok(violations)))
}

/// POST /api/violations/{id}/acknowledge
pub async fn acknowledge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AcknowledgeViolationRequest>,
) -> Result<Json<ApiResponse<ComplianceViolation>>, ApiError> {
    let violation = state
        .violation_repo
        .acknowledge(id, body.acknowledged_by, Utc::now())
        .await?;
    Ok(Json(ApiResponse::ok(violation)))
}
