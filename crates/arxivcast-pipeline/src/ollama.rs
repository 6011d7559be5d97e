//! Ollama chat client for narration drafting.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Ollama API client.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: Client,
}

/// Ollama chat request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Ollama chat response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> PipelineResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            client,
        })
    }

    /// Model this client was configured with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user prompt and return the assistant reply.
    pub async fn chat(&self, prompt: &str) -> PipelineResult<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        debug!("Calling Ollama model {} at {}", self.model, url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::backend_failed(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::backend_failed(format!(
                "Ollama returned {}: {}",
                status, error_text
            )));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::backend_failed(format!("Failed to parse Ollama response: {e}")))?;

        let content = reply.message.content.trim().to_string();
        if content.is_empty() {
            return Err(PipelineError::backend_failed("Ollama returned empty content"));
        }
        Ok(content)
    }
}
