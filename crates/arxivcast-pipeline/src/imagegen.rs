//! Generative poster backend client.
//!
//! Talks to a Stable Diffusion web UI compatible `/sdapi/v1/txt2img`
//! endpoint and returns decoded PNG bytes. Payloads are checked for
//! decodability before they are allowed anywhere near the poster slot, so
//! a half-broken backend degrades to the template tier instead of feeding
//! the video stage a corrupt file.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Diffusion steps per poster; enough for a legible slide at 512x768.
const TXT2IMG_STEPS: u32 = 20;

/// Image generation API client.
pub struct ImageGenClient {
    base_url: String,
    client: Client,
}

/// txt2img request.
#[derive(Debug, Serialize)]
struct Txt2ImgRequest<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
    steps: u32,
}

/// txt2img response.
#[derive(Debug, Deserialize)]
struct Txt2ImgResponse {
    images: Vec<String>,
}

impl ImageGenClient {
    /// Create a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PipelineResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Request one image and return the decoded PNG bytes.
    pub async fn txt2img(&self, prompt: &str, width: u32, height: u32) -> PipelineResult<Vec<u8>> {
        let url = format!("{}/sdapi/v1/txt2img", self.base_url);

        let request = Txt2ImgRequest {
            prompt,
            width,
            height,
            steps: TXT2IMG_STEPS,
        };

        debug!("Requesting {}x{} image from {}", width, height, url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::backend_failed(format!("Image request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::backend_failed(format!(
                "Image backend returned {}: {}",
                status, error_text
            )));
        }

        let reply: Txt2ImgResponse = response.json().await.map_err(|e| {
            PipelineError::backend_failed(format!("Failed to parse image response: {e}"))
        })?;

        let first = reply
            .images
            .first()
            .ok_or_else(|| PipelineError::backend_failed("Image backend returned no images"))?;

        let bytes = STANDARD
            .decode(first)
            .map_err(|e| PipelineError::backend_failed(format!("Invalid base64 image payload: {e}")))?;

        // Reject undecodable payloads before they reach disk
        image::load_from_memory(&bytes)
            .map_err(|e| PipelineError::backend_failed(format!("Undecodable image payload: {e}")))?;

        Ok(bytes)
    }
}
