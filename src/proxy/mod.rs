//! Forwarding core
//!
//! A single configurable forwarder replaces the pile of near-identical proxy
//! handlers the original deployment grew: each variant is just a
//! [`ForwardPolicy`] value. One inbound call maps to exactly one upstream
//! call; retrying is the caller's job.

use axum::http::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppResult;

/// Request headers that must not reach the upstream API. `host` and `origin`
/// make Google reject or misroute the call; `content-length` may no longer
/// match once the body has been sanitized.
const STRIPPED_REQUEST_HEADERS: &[HeaderName] = &[
    header::HOST,
    header::CONNECTION,
    header::ORIGIN,
    header::REFERER,
    header::CONTENT_LENGTH,
];

/// Forwarded-for carries the caller's address; the upstream has no use for it.
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Fields the Gemma model variants reject in a `generateContent` body
pub const GEMMA_INCOMPATIBLE_FIELDS: &[&str] =
    &["systemInstruction", "generationConfig.responseMimeType"];

/// How the upstream path is derived from the inbound request
#[derive(Debug, Clone)]
pub enum PathMode {
    /// Always call a hardcoded model-and-action suffix
    FixedSuffix(String),
    /// Append the inbound path with the route prefix already stripped
    Passthrough,
}

/// Which HTTP method the upstream call uses
#[derive(Debug, Clone, Copy)]
pub enum MethodPolicy {
    /// Always POST, regardless of the inbound method
    ForcePost,
    /// Mirror the inbound method
    Passthrough,
}

/// One forwarding variant, expressed as data
#[derive(Debug, Clone)]
pub struct ForwardPolicy {
    pub path: PathMode,
    pub method: MethodPolicy,
    /// Dotted JSON paths deleted from the body before forwarding
    pub strip_fields: Vec<String>,
}

impl ForwardPolicy {
    /// Policy for the bare `/api/proxy` route: hardcoded generateContent
    /// suffix, forced POST, matching the original hardcoded handler.
    pub fn fixed(model: &str, gemma_compat: bool) -> Self {
        Self {
            path: PathMode::FixedSuffix(format!("v1beta/models/{}:generateContent", model)),
            method: MethodPolicy::ForcePost,
            strip_fields: strip_fields_for(gemma_compat),
        }
    }

    /// Policy for `/api/proxy/*path`: path and method pass through.
    pub fn passthrough(gemma_compat: bool) -> Self {
        Self {
            path: PathMode::Passthrough,
            method: MethodPolicy::Passthrough,
            strip_fields: strip_fields_for(gemma_compat),
        }
    }
}

fn strip_fields_for(gemma_compat: bool) -> Vec<String> {
    if gemma_compat {
        GEMMA_INCOMPATIBLE_FIELDS
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        Vec::new()
    }
}

/// Upstream status and raw body, relayed verbatim to the caller
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

/// Stateless upstream forwarder
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    base_url: String,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Relay one inbound request to the upstream API.
    ///
    /// `stripped_path` is the inbound path with the route prefix removed
    /// (ignored in fixed-suffix mode); `query` is the raw inbound query
    /// string, preserved on the upstream URL so the `key` parameter travels
    /// with the call.
    pub async fn forward(
        &self,
        policy: &ForwardPolicy,
        method: Method,
        headers: &HeaderMap,
        stripped_path: Option<&str>,
        query: Option<&str>,
        body: Bytes,
    ) -> AppResult<UpstreamReply> {
        let path = match &policy.path {
            PathMode::FixedSuffix(suffix) => suffix.as_str(),
            PathMode::Passthrough => stripped_path.unwrap_or(""),
        };

        let mut url = join_upstream_url(&self.base_url, path);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }

        let method = match policy.method {
            MethodPolicy::ForcePost => Method::POST,
            MethodPolicy::Passthrough => method,
        };

        let body = sanitize_body(body, &policy.strip_fields);

        debug!(method = %method, url = %url, "Forwarding to upstream");

        let response = self
            .client
            .request(method, &url)
            .headers(filter_forward_headers(headers))
            .body(body)
            .send()
            .await?;

        let status =
            StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let body = response.text().await?;

        Ok(UpstreamReply { status, body })
    }
}

/// Join the upstream base URL and a path without doubling or dropping slashes
pub fn join_upstream_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Copy inbound headers, dropping the ones the upstream rejects and forcing
/// `Content-Type: application/json`
pub fn filter_forward_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::new();

    for (name, value) in headers {
        if STRIPPED_REQUEST_HEADERS.contains(name) || *name == X_FORWARDED_FOR {
            continue;
        }
        filtered.insert(name.clone(), value.clone());
    }

    filtered.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    filtered
}

/// Delete the policy's field paths from a JSON body before forwarding.
///
/// Best-effort: a body that does not parse as JSON is forwarded untouched.
pub fn sanitize_body(body: Bytes, strip_fields: &[String]) -> Bytes {
    if strip_fields.is_empty() || body.is_empty() {
        return body;
    }

    let mut value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Request body is not JSON, skipping field stripping");
            return body;
        }
    };

    for path in strip_fields {
        remove_field_path(&mut value, path);
    }

    match serde_json::to_vec(&value) {
        Ok(bytes) => Bytes::from(bytes),
        Err(_) => body,
    }
}

/// Remove a dotted field path (e.g. `generationConfig.responseMimeType`)
/// from a JSON value, if present
fn remove_field_path(value: &mut Value, path: &str) {
    let mut current = value;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let Some(object) = current.as_object_mut() else {
            return;
        };
        if segments.peek().is_none() {
            object.remove(segment);
            return;
        }
        match object.get_mut(segment) {
            Some(next) => current = next,
            None => return,
        }
    }
}
