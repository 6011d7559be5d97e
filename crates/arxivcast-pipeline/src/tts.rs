//! Speech synthesis backends.
//!
//! Two tiers live here: the primary HTTP speech service (CosyVoice-style
//! `/api/tts`, returning WAV bytes) and the OS speech engine fallback
//! (`say` on macOS, `espeak-ng` elsewhere). The terminal silent-track tier
//! lives in `arxivcast_media::audio`.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use arxivcast_media::looks_like_wav;

use crate::error::{PipelineError, PipelineResult};

/// Speech synthesis API client.
pub struct TtsClient {
    base_url: String,
    client: Client,
}

/// Synthesis request.
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    speaker_id: u32,
    speed: f32,
}

impl TtsClient {
    /// Create a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PipelineResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Synthesize `text` and return WAV bytes.
    pub async fn synthesize(&self, text: &str) -> PipelineResult<Vec<u8>> {
        let url = format!("{}/api/tts", self.base_url);

        let request = SpeechRequest {
            text,
            speaker_id: 0,
            speed: 1.0,
        };

        debug!("Requesting speech synthesis from {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::backend_failed(format!("TTS request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::backend_failed(format!(
                "TTS backend returned {}: {}",
                status, error_text
            )));
        }

        let bytes = response.bytes().await?.to_vec();

        // A 200 with an HTML error page must not land in the audio slot
        if !looks_like_wav(&bytes) {
            return Err(PipelineError::backend_failed(
                "TTS backend returned non-WAV payload",
            ));
        }

        Ok(bytes)
    }
}

/// Name of the OS speech command on this platform.
#[cfg(target_os = "macos")]
const OS_TTS_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
const OS_TTS_COMMAND: &str = "espeak-ng";

/// Render `text` to `output` with the operating system's speech engine.
pub async fn os_tts(text: &str, output: &Path) -> PipelineResult<()> {
    which::which(OS_TTS_COMMAND)
        .map_err(|_| PipelineError::backend_failed(format!("{OS_TTS_COMMAND} not found in PATH")))?;

    let mut command = tokio::process::Command::new(OS_TTS_COMMAND);
    #[cfg(target_os = "macos")]
    command.arg("-o").arg(output).arg(text);
    #[cfg(not(target_os = "macos"))]
    command.arg("-w").arg(output).arg(text);

    debug!("Running OS TTS: {} -> {}", OS_TTS_COMMAND, output.display());

    let result = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !result.status.success() {
        return Err(PipelineError::backend_failed(format!(
            "{} failed: {}",
            OS_TTS_COMMAND,
            String::from_utf8_lossy(&result.stderr).trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn wav_header() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&36u32.to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes
    }

    #[tokio::test]
    async fn test_synthesize_returns_wav_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(wav_header()))
            .mount(&server)
            .await;

        let client = TtsClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let bytes = client.synthesize("hello").await.unwrap();
        assert!(looks_like_wav(&bytes));
    }

    #[tokio::test]
    async fn test_synthesize_rejects_non_wav_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = TtsClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.synthesize("hello").await,
            Err(PipelineError::BackendFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_synthesize_maps_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = TtsClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        assert!(client.synthesize("hello").await.is_err());
    }
}
