//! Forwarding endpoint handlers
//!
//! Two routes share one relay path: the bare `/api/proxy` route always calls
//! the configured model's `generateContent` action, while `/api/proxy/*path`
//! relays whatever upstream path the caller asked for. The caller-supplied
//! `key` query parameter is required on both and travels to the upstream as
//! part of the preserved query string.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{OriginalUri, Path, Query, Request, State},
    http::{header, Method, StatusCode},
    response::Response,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    proxy::ForwardPolicy,
    AppState,
};

/// Query parameters recognized by the forwarding endpoint
#[derive(Debug, Deserialize)]
pub struct ForwardParams {
    pub key: Option<String>,
}

/// Fixed-suffix forwarding: `ANY /api/proxy`
pub async fn forward_generate(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ForwardParams>,
    request: Request,
) -> AppResult<Response> {
    let policy = state.fixed_policy.clone();
    relay(state, policy, None, uri.query(), params, request).await
}

/// Path-passthrough forwarding: `ANY /api/proxy/*path`
pub async fn forward_passthrough(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Path(rest): Path<String>,
    Query(params): Query<ForwardParams>,
    request: Request,
) -> AppResult<Response> {
    let policy = state.passthrough_policy.clone();
    relay(state, policy, Some(rest), uri.query(), params, request).await
}

/// Relay one inbound request through the forwarder
async fn relay(
    state: Arc<AppState>,
    policy: ForwardPolicy,
    stripped_path: Option<String>,
    query: Option<&str>,
    params: ForwardParams,
    request: Request,
) -> AppResult<Response> {
    if request.method() == Method::OPTIONS {
        return preflight_response();
    }

    if params.key.is_none() {
        return Err(AppError::MissingApiKey);
    }

    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let headers = request.headers().clone();
    let query = query.map(str::to_string);

    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read request body: {}", e)))?;

    let reply = state
        .forwarder
        .forward(
            &policy,
            method.clone(),
            &headers,
            stripped_path.as_deref(),
            query.as_deref(),
            body,
        )
        .await?;

    info!(
        method = %method,
        path = %path,
        status = %reply.status,
        duration_ms = %format!("{:.2}", start_time.elapsed().as_secs_f64() * 1000.0),
        "Forwarded request completed"
    );

    Response::builder()
        .status(reply.status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(reply.body))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}

/// Answer an OPTIONS preflight without touching the upstream
fn preflight_response() -> AppResult<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            "GET,OPTIONS,PATCH,DELETE,POST,PUT",
        )
        .header(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "X-Requested-With, Accept, Content-Type, Date",
        )
        .body(Body::empty())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
