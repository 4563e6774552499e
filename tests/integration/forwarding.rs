//! Forwarding endpoint integration tests

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, gemini, TestApp, TEST_GENERATE_PATH};

#[tokio::test]
async fn test_options_preflight_returns_200_with_cors_and_empty_body() {
    let app = TestApp::spawn().await;
    let router = common::router(&app.upstream.uri(), false);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/proxy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());
    assert!(app.upstream_requests().await.is_empty());
}

#[tokio::test]
async fn test_missing_key_returns_400_without_upstream_call() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/api/proxy")
        .json(&json!({ "contents": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Missing API Key" })
    );
    assert!(app.upstream_requests().await.is_empty());
}

#[tokio::test]
async fn test_upstream_status_and_body_pass_through_unchanged() {
    let app = TestApp::spawn().await;
    let upstream_body = r#"{"error":{"code":429,"message":"quota"}}"#;

    Mock::given(method("POST"))
        .and(path(TEST_GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_string(upstream_body)
                .insert_header("content-type", "text/plain"),
        )
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/api/proxy?key=test-key")
        .json(&json!({ "contents": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.text(), upstream_body);
    // Content type is forced to JSON even when the upstream says otherwise
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_fixed_route_forces_post_and_carries_key() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path(TEST_GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini::candidate_body("{\"ok\":true}")),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    // Inbound GET still reaches the upstream as POST on the fixed route
    let response = app
        .server
        .get("/api/proxy?key=test-key")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_passthrough_strips_prefix_without_doubling_slashes() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemma-3-27b-it:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/api/proxy/v1beta/models/gemma-3-27b-it:generateContent?key=test-key")
        .json(&json!({ "contents": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let requests = app.upstream_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        "/v1beta/models/gemma-3-27b-it:generateContent"
    );
    assert_eq!(requests[0].url.query(), Some("key=test-key"));
}

#[tokio::test]
async fn test_passthrough_mirrors_inbound_method() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"models":[]}"#))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .get("/api/proxy/v1beta/models?key=test-key")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_browser_routing_headers_are_not_forwarded() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path(TEST_GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&app.upstream)
        .await;

    app.server
        .post("/api/proxy?key=test-key")
        .add_header(
            header::ORIGIN,
            "https://moodlab.example".parse::<HeaderValue>().unwrap(),
        )
        .add_header(
            header::REFERER,
            "https://moodlab.example/bar".parse::<HeaderValue>().unwrap(),
        )
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            "203.0.113.7".parse::<HeaderValue>().unwrap(),
        )
        .json(&json!({ "contents": [] }))
        .await;

    let requests = app.upstream_requests().await;
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert!(headers.get("origin").is_none());
    assert!(headers.get("referer").is_none());
    assert!(headers.get("x-forwarded-for").is_none());
    assert_eq!(headers.get("content-type").unwrap(), "application/json");
}

#[tokio::test]
async fn test_gemma_compat_strips_unsupported_fields() {
    let app = TestApp::spawn_with(true).await;

    Mock::given(method("POST"))
        .and(path(TEST_GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&app.upstream)
        .await;

    app.server
        .post("/api/proxy?key=test-key")
        .json(&json!({
            "contents": [{ "parts": [{ "text": "hi" }] }],
            "systemInstruction": { "parts": [{ "text": "persona" }] },
            "generationConfig": {
                "temperature": 0.8,
                "responseMimeType": "application/json"
            }
        }))
        .await;

    let requests = app.upstream_requests().await;
    assert_eq!(requests.len(), 1);
    let forwarded: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(forwarded.get("systemInstruction").is_none());
    assert!(forwarded["generationConfig"].get("responseMimeType").is_none());
    assert_eq!(forwarded["generationConfig"]["temperature"], 0.8);
    assert_eq!(forwarded["contents"][0]["parts"][0]["text"], "hi");
}

#[tokio::test]
async fn test_unreachable_upstream_returns_500_envelope() {
    // Nothing listens on this port
    let server = axum_test::TestServer::new(common::router("http://127.0.0.1:9", false))
        .expect("Failed to create test server");

    let response = server
        .post("/api/proxy?key=test-key")
        .json(&json!({ "contents": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Proxy Failed");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_each_inbound_call_maps_to_exactly_one_upstream_call() {
    let app = TestApp::spawn().await;

    // The proxy itself must not retry on upstream failure
    Mock::given(method("POST"))
        .and(path(TEST_GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error":"boom"}"#))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/api/proxy?key=test-key")
        .json(&json!({ "contents": [] }))
        .await;

    assert_eq!(
        response.status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(response.text(), r#"{"error":"boom"}"#);
    assert_eq!(app.upstream_requests().await.len(), 1);
}

#[tokio::test]
async fn test_mock_server_sanity() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let status = reqwest::get(format!("{}/ping", upstream.uri()))
        .await
        .unwrap()
        .status();
    assert_eq!(status, 200);
}
