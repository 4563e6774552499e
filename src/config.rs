//! Configuration management for the Mood Lab backend
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Base URL of the upstream generative-language API
    pub upstream_api_url: String,
    /// Model used by the fixed-suffix forwarding route
    pub upstream_model: String,

    /// Strip request fields that Gemma model variants reject
    pub gemma_compat: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("MOODLAB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("MOODLAB_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid MOODLAB_PORT")?,

            upstream_api_url: env::var("UPSTREAM_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            upstream_model: env::var("UPSTREAM_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),

            gemma_compat: env::var("GEMMA_COMPAT")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}
