//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use arxivcast_models::{BackendMode, EncodingConfig};

/// Default arXiv export API endpoint.
pub const DEFAULT_ARXIV_URL: &str = "http://export.arxiv.org/api/query";
/// Default Ollama endpoint for narration drafting.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen3";
/// Default image generation endpoint (Stable Diffusion web UI).
pub const DEFAULT_IMAGE_URL: &str = "http://localhost:7860";
/// Default speech synthesis endpoint.
pub const DEFAULT_TTS_URL: &str = "http://localhost:8880";

/// Pipeline configuration.
///
/// CLI-facing knobs (category, batch size, backend mode, output root) are
/// overwritten from the parsed arguments in `main`; endpoints and timeouts
/// come from the environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// arXiv category to fetch, e.g. `cs.AI`
    pub category: String,
    /// Maximum papers per run
    pub max_papers: usize,
    /// Which backend tiers the run may use
    pub backend_mode: BackendMode,
    /// Output root directory
    pub output_dir: PathBuf,
    /// arXiv export API base URL
    pub arxiv_url: String,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama model name
    pub ollama_model: String,
    /// Image generation base URL
    pub image_url: String,
    /// Speech synthesis base URL
    pub tts_url: String,
    /// Timeout for the fetch request
    pub fetch_timeout: Duration,
    /// Timeout per generative backend call
    pub backend_timeout: Duration,
    /// Timeout per FFmpeg invocation, seconds
    pub ffmpeg_timeout_secs: u64,
    /// Encoding shared by every clip and the re-encoded report
    pub encoding: EncodingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            category: "cs.AI".to_string(),
            max_papers: 10,
            backend_mode: BackendMode::default(),
            output_dir: PathBuf::from("output"),
            arxiv_url: DEFAULT_ARXIV_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            fetch_timeout: Duration::from_secs(30),
            backend_timeout: Duration::from_secs(120),
            ffmpeg_timeout_secs: 300,
            encoding: EncodingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            arxiv_url: std::env::var("ARXIVCAST_ARXIV_URL")
                .unwrap_or_else(|_| DEFAULT_ARXIV_URL.to_string()),
            ollama_url: std::env::var("ARXIVCAST_OLLAMA_URL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            ollama_model: std::env::var("ARXIVCAST_OLLAMA_MODEL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string()),
            image_url: std::env::var("ARXIVCAST_IMAGE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_URL.to_string()),
            tts_url: std::env::var("ARXIVCAST_TTS_URL")
                .unwrap_or_else(|_| DEFAULT_TTS_URL.to_string()),
            fetch_timeout: Duration::from_secs(
                std::env::var("ARXIVCAST_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            backend_timeout: Duration::from_secs(
                std::env::var("ARXIVCAST_BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            ffmpeg_timeout_secs: std::env::var("ARXIVCAST_FFMPEG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.category, "cs.AI");
        assert_eq!(config.max_papers, 10);
        assert_eq!(config.backend_mode, BackendMode::Full);
        assert_eq!(config.arxiv_url, DEFAULT_ARXIV_URL);
        assert_eq!(config.ffmpeg_timeout_secs, 300);
    }
}
