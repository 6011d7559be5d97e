//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Backend request failed: {0}")]
    BackendFailed(String),

    #[error("Combine failed: {0}")]
    CombineFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Feed parse error: {0}")]
    FeedParse(#[from] atom_syndication::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Media error: {0}")]
    Media(#[from] arxivcast_media::MediaError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    pub fn backend_failed(msg: impl Into<String>) -> Self {
        Self::BackendFailed(msg.into())
    }

    pub fn combine_failed(msg: impl Into<String>) -> Self {
        Self::CombineFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
