//! Image acquisition helper (dining flavor only)
//!
//! Builds an image-generation-by-URL request and preloads it with a bounded
//! timeout. At most one fetch, no retry: the UI shows a placeholder when the
//! preload fails, so this helper never errors.

use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::error::{AppError, AppResult};

/// Default image-generation-by-URL service
pub const DEFAULT_IMAGE_SERVICE_URL: &str = "https://image.pollinations.ai/prompt";

/// Default preload bound
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Appended to every dish prompt to keep the art style consistent
pub const STYLE_SUFFIX: &str = " kawaii chibi food, adorable style, soft pastel colors, sticker \
                                art, thick rounded outlines, white background, simple vector, \
                                flat design, no photorealism, high quality 2d art, cute game asset";

/// Build the image service URL for a prompt. The seed varies the output and
/// the timestamp busts any cache in front of the service.
pub fn build_image_url(base: &str, prompt: &str, seed: u32, cache_bust: i64) -> AppResult<String> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid image service URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("image service URL cannot be a base")))?
        .push(prompt);

    url.query_pairs_mut()
        .append_pair("width", "512")
        .append_pair("height", "512")
        .append_pair("nologo", "true")
        .append_pair("seed", &seed.to_string())
        .append_pair("t", &cache_bust.to_string());

    Ok(url.into())
}

/// Fetch the image once so the UI can display it instantly, resolving to a
/// success flag instead of an error. The timeout covers the whole download.
pub async fn preload_image(client: &reqwest::Client, url: &str, timeout: Duration) -> bool {
    let downloaded = async {
        let response = client.get(url).timeout(timeout).send().await.ok()?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "Image service returned an error");
            return None;
        }
        response.bytes().await.ok()?;
        Some(())
    }
    .await;

    downloaded.is_some()
}
