//! Mood Lab backend
//!
//! This library provides the two pieces behind the Mood Lab demo: a
//! key-hiding, CORS-fixing forwarding endpoint in front of the Google
//! generative-language API, and a generation client that turns free-text
//! moods into cocktail or dish records with retry and offline fallbacks.

pub mod config;
pub mod error;
pub mod generate;
pub mod proxy;
pub mod routes;

use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};
pub use crate::generate::{CallTarget, GeneratedArtifact, Generator, GeneratorConfig, MoodProfile};
pub use crate::proxy::{ForwardPolicy, Forwarder};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub start_time: Instant,
    pub forwarder: Forwarder,
    /// Policy for the bare `/api/proxy` route
    pub fixed_policy: ForwardPolicy,
    /// Policy for the `/api/proxy/*path` route
    pub passthrough_policy: ForwardPolicy,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Connection pooling shared by the forwarder; the generous timeout is
        // a backstop, the upstream call itself has no tighter bound
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(std::time::Duration::from_secs(300))
            .build()?;

        let forwarder = Forwarder::new(http_client.clone(), &config.upstream_api_url);
        let fixed_policy = ForwardPolicy::fixed(&config.upstream_model, config.gemma_compat);
        let passthrough_policy = ForwardPolicy::passthrough(config.gemma_compat);

        Ok(Self {
            config,
            http_client,
            start_time: Instant::now(),
            forwarder,
            fixed_policy,
            passthrough_policy,
        })
    }
}
