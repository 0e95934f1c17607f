//! Gateway error taxonomy: one variant per reportable failure kind, each
//! mapped to its own HTTP status and a `{ success: false, ... }` JSON body.
//!
//! Validation and configuration errors are terminal for the request; upstream
//! call/parse errors surface as-is with their diagnostics. Deterministic
//! results are never attached to error payloads as if they were approved
//! output.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field is absent or unusable.
    #[error("{0} is required")]
    Validation(String),

    /// Server-side configuration is missing (e.g. the API key). Never blamed
    /// on user input.
    #[error("{0}")]
    Configuration(String),

    /// The model service answered with a non-success status.
    #[error("API error: {status}")]
    Upstream { status: u16, detail: String },

    /// The model text did not parse as the required JSON shape.
    #[error("Failed to parse JSON")]
    UpstreamParse { raw: String },

    /// Anything else — network faults, internal invariant breaks.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamParse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Upstream { detail, .. } => json!({
                "success": false,
                "error": self.to_string(),
                "detail": detail,
            }),
            ApiError::UpstreamParse { raw } => json!({
                "success": false,
                "error": self.to_string(),
                "raw": raw,
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };
        tracing::warn!(target: "kokoro::gateway", status = %status, error = %self, "request failed");
        (status, Json(body)).into_response()
    }
}
