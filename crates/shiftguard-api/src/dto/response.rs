//! Response DTOs.

use serde::{Deserialize, Serialize};

use shiftguard_compliance::enforcement::{AdjustmentSummary, EnforcementOutcome};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Detailed health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Database connectivity.
    pub database: String,
    /// Service version.
    pub version: String,
}

/// The enforcement trigger's contract: a flag plus the summary when a
/// split happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementResponse {
    /// Whether the period was adjusted.
    pub was_adjusted: bool,
    /// The adjustment applied, when `was_adjusted` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<AdjustmentSummary>,
    /// Why nothing was done, when `was_adjusted` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl From<EnforcementOutcome> for EnforcementResponse {
    fn from(outcome: EnforcementOutcome) -> Self {
        match outcome {
            EnforcementOutcome::Adjusted(summary) => Self {
                was_adjusted: true,
                adjustment: Some(summary),
                skip_reason: None,
            },
            EnforcementOutcome::Skipped { reason } => Self {
                was_adjusted: false,
                adjustment: None,
                skip_reason: Some(reason.to_string()),
            },
        }
    }
}
