use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Envelope of every successful response
#[derive(Serialize, ToSchema)]
#[serde(bound = "T: Serialize")]
pub struct SuccessResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    pub data: T,
}

/// Envelope of every failed response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable code for programmatic handling
    #[schema(example = "VALIDATION_FAILED")]
    pub code: String,

    #[schema(example = "Some fields are invalid")]
    pub message: String,

    /// Per-field messages, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}
