//! Common test utilities
//!
//! Shared fixtures: a mock upstream generative-language API (wiremock) and a
//! test server wrapping the real router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use wiremock::MockServer;

use moodlab::{routes, AppState, Config};

/// Model used by the fixed-suffix route in tests
pub const TEST_MODEL: &str = "gemini-1.5-flash";

/// The upstream path the fixed-suffix route must call for [`TEST_MODEL`]
pub const TEST_GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

/// Config pointing at a mock upstream
pub fn test_config(upstream_url: &str, gemma_compat: bool) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        upstream_api_url: upstream_url.to_string(),
        upstream_model: TEST_MODEL.to_string(),
        gemma_compat,
    }
}

/// Build the real application router against an arbitrary upstream URL
pub fn router(upstream_url: &str, gemma_compat: bool) -> Router {
    let state = Arc::new(
        AppState::new(test_config(upstream_url, gemma_compat)).expect("Failed to build app state"),
    );
    routes::create_router(state)
}

/// Full test environment: mock upstream plus the app under test
pub struct TestApp {
    pub server: TestServer,
    pub upstream: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    pub async fn spawn_with(gemma_compat: bool) -> Self {
        let upstream = MockServer::start().await;
        let server = TestServer::new(router(&upstream.uri(), gemma_compat))
            .expect("Failed to create test server");
        Self { server, upstream }
    }

    /// Requests the mock upstream has received so far
    pub async fn upstream_requests(&self) -> Vec<wiremock::Request> {
        self.upstream.received_requests().await.unwrap_or_default()
    }
}

/// Mock upstream response payloads
pub mod gemini {
    use serde_json::{json, Value};

    /// A `generateContent` payload whose single candidate carries `text`
    pub fn candidate_body(text: &str) -> Value {
        json!({
            "candidates": [
                { "content": { "parts": [{ "text": text }] } }
            ]
        })
    }

    /// A complete cocktail record as the model would emit it
    pub fn cocktail_json(name: &str) -> String {
        json!({
            "name": name,
            "cnName": "试验特调",
            "liquidColor": "linear-gradient(180deg, red 0%, black 100%)",
            "base": "金酒",
            "mid": "白桃",
            "top": "薄荷",
            "desc": "测试用的一杯。",
            "analysis": { "base": "a", "mid": "b", "top": "c" }
        })
        .to_string()
    }

    /// A complete dish record as the model would emit it
    pub fn dish_json(name: &str) -> String {
        json!({
            "name": name,
            "cnName": "试验小食",
            "themeColor": "linear-gradient(135deg, #fbbf24 0%, #f59e0b 100%)",
            "main": "豚骨汤",
            "side": "溏心蛋",
            "garnish": "鸣门卷",
            "desc": "测试用的一碗。",
            "imagePrompt": "cute test bowl",
            "analysis": { "main": "a", "side": "b", "garnish": "c" }
        })
        .to_string()
    }
}
