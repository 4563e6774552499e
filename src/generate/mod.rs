//! Generation client
//!
//! Turns a free-text mood into a [`GeneratedArtifact`] by prompting the
//! upstream generative-language API, with retry/backoff and an offline
//! fallback set. The call path never fails the caller: when no API key is
//! configured or every attempt is exhausted, a pre-written record is served
//! instead.

pub mod artifact;
pub mod extract;
pub mod image;
pub mod profile;

use std::future::Future;
use std::time::Duration;

use axum::http::StatusCode;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

pub use artifact::{GeneratedArtifact, NoteAnalysis};
pub use profile::MoodProfile;

/// Where the generation call is sent, decided by deployment context
#[derive(Debug, Clone)]
pub enum CallTarget {
    /// Call the upstream API directly (same-origin deployments)
    Direct { base_url: String, model: String },
    /// Route through the forwarding endpoint
    Proxy { url: String },
}

impl CallTarget {
    fn url(&self, key: &str) -> String {
        match self {
            CallTarget::Direct { base_url, model } => format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                base_url.trim_end_matches('/'),
                model,
                key
            ),
            CallTarget::Proxy { url } => format!("{}?key={}", url.trim_end_matches('/'), key),
        }
    }
}

/// Explicit generator configuration; there is no ambient global state
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// `None` silently degrades to the fallback set
    pub api_key: Option<String>,
    pub target: CallTarget,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub max_attempts: u32,
    /// First retry delay; doubles after every failed attempt
    pub initial_backoff: Duration,
    pub image_service_url: String,
    pub image_timeout: Duration,
}

impl GeneratorConfig {
    pub fn new(api_key: Option<String>, target: CallTarget) -> Self {
        Self {
            api_key,
            target,
            temperature: 0.8,
            max_output_tokens: 1024,
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            image_service_url: image::DEFAULT_IMAGE_SERVICE_URL.to_string(),
            image_timeout: image::DEFAULT_IMAGE_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Mood-to-artifact generator
pub struct Generator {
    client: reqwest::Client,
    config: GeneratorConfig,
    profile: MoodProfile,
}

impl Generator {
    pub fn new(client: reqwest::Client, config: GeneratorConfig, profile: MoodProfile) -> Self {
        Self {
            client,
            config,
            profile,
        }
    }

    /// Generate an artifact for a mood. Infallible by design: the caller
    /// always receives a record to show.
    pub async fn generate(&self, mood: &str) -> GeneratedArtifact {
        let Some(key) = self.config.api_key.as_deref() else {
            info!(profile = self.profile.name(), "No API key configured, serving fallback");
            return self.pick_fallback();
        };

        let url = self.config.target.url(key);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: self.profile.prompt(mood),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let mut delay = self.config.initial_backoff;
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&url, &request).await {
                Ok(artifact) => {
                    debug!(
                        profile = self.profile.name(),
                        attempt,
                        name = %artifact.name,
                        "Generation succeeded"
                    );
                    return artifact;
                }
                Err(e) => {
                    warn!(
                        profile = self.profile.name(),
                        attempt,
                        max_attempts = self.config.max_attempts,
                        error = %e,
                        "Generation attempt failed"
                    );
                    if attempt < self.config.max_attempts {
                        sleep(delay).await;
                        delay *= 2;
                    }
                }
            }
        }

        info!(profile = self.profile.name(), "All attempts exhausted, serving fallback");
        self.pick_fallback()
    }

    /// One upstream call: send the prompt, pull the first candidate's text,
    /// extract and parse the embedded JSON object
    async fn attempt(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> AppResult<GeneratedArtifact> {
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus(
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            ));
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(AppError::MalformedOutput)?;

        let object = extract::extract_json_object(&text).ok_or(AppError::MalformedOutput)?;
        Ok(serde_json::from_str(object)?)
    }

    /// Fetch generated dish art for the artifact's image prompt and record
    /// the URL. No-op for profiles without images; never fails — the UI
    /// substitutes a placeholder when the preload did not finish.
    pub async fn attach_image(&self, artifact: &mut GeneratedArtifact) {
        if !self.profile.wants_image() {
            return;
        }

        let prompt = match artifact.image_prompt.as_deref() {
            Some(p) => format!("{}{}", p, image::STYLE_SUFFIX),
            None => format!("{} cute food{}", artifact.name, image::STYLE_SUFFIX),
        };
        let seed: u32 = rand::rng().random_range(0..1000);
        let cache_bust = chrono::Utc::now().timestamp_millis();

        let url = match image::build_image_url(
            &self.config.image_service_url,
            &prompt,
            seed,
            cache_bust,
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Failed to build image URL");
                return;
            }
        };

        if !image::preload_image(&self.client, &url, self.config.image_timeout).await {
            warn!(url = %url, "Image preload failed, placeholder will be shown");
        }
        artifact.image_url = Some(url);
    }

    fn pick_fallback(&self) -> GeneratedArtifact {
        let fallbacks = self.profile.fallbacks();
        let index = rand::rng().random_range(0..fallbacks.len());
        fallbacks[index].clone()
    }
}

/// Run `future` but take at least `min` to complete, so a UI animation is
/// guaranteed its minimum duration regardless of network latency. Purely
/// cosmetic pacing; unrelated to retry timing.
pub async fn with_min_delay<F: Future>(future: F, min: Duration) -> F::Output {
    let (output, _) = tokio::join!(future, sleep(min));
    output
}
