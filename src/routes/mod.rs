//! HTTP routes for the Mood Lab backend
//!
//! This module defines all HTTP endpoints exposed by the proxy.

pub mod forward;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration: the whole point of the proxy is to be reachable
    // from any origin the demo is served from
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/proxy", any(forward::forward_generate))
        .route("/api/proxy/*path", any(forward::forward_passthrough))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
