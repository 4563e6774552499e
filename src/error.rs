//! Error types for the Mood Lab backend
//!
//! The forwarding endpoint speaks a flat `{error, details?}` envelope to the
//! browser, so `IntoResponse` serializes that shape directly. Every error
//! response also carries the wildcard CORS header so a failing call is still
//! visible to a cross-origin caller.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing API Key")]
    MissingApiKey,

    #[error("upstream returned status {0}")]
    UpstreamStatus(StatusCode),

    #[error("no JSON object found in model output")]
    MalformedOutput,

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Flat error envelope returned by the forwarding endpoint
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::MissingApiKey => (
                StatusCode::BAD_REQUEST,
                "Missing API Key".to_string(),
                None,
            ),
            AppError::HttpError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Proxy Failed".to_string(),
                Some(e.to_string()),
            ),
            AppError::UpstreamStatus(_) | AppError::MalformedOutput => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Proxy Failed".to_string(),
                Some(self.to_string()),
            ),
            AppError::JsonError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Proxy Failed".to_string(),
                Some(e.to_string()),
            ),
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Error".to_string(),
                Some(e.to_string()),
            ),
        };

        let body = ErrorEnvelope { error, details };

        (
            status,
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            Json(body),
        )
            .into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
