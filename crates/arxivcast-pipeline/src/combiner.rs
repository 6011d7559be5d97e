//! Report combiner.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use arxivcast_media::{concat_copy, concat_reencode};
use arxivcast_models::EncodingConfig;

use crate::error::{PipelineError, PipelineResult};

/// Joins per-item clips into the single dated report video.
#[async_trait]
pub trait ReportCombiner: Send + Sync {
    async fn combine(&self, clips: &[PathBuf], output: &Path) -> PipelineResult<()>;
}

/// ffmpeg-backed combiner: stream-copy concat first, re-encode on failure.
///
/// Stream copy is safe because every clip comes out of the same slide
/// pipeline with one shared encoding config; the re-encode path covers
/// clips that survived from an earlier partial run with different settings.
pub struct FfmpegCombiner {
    encoding: EncodingConfig,
    timeout_secs: u64,
}

impl FfmpegCombiner {
    pub fn new(encoding: EncodingConfig, timeout_secs: u64) -> Self {
        Self {
            encoding,
            timeout_secs,
        }
    }
}

#[async_trait]
impl ReportCombiner for FfmpegCombiner {
    async fn combine(&self, clips: &[PathBuf], output: &Path) -> PipelineResult<()> {
        let present: Vec<PathBuf> = clips
            .iter()
            .filter(|clip| {
                let exists = clip.exists();
                if !exists {
                    warn!("Skipping missing clip: {}", clip.display());
                }
                exists
            })
            .cloned()
            .collect();

        if present.is_empty() {
            return Err(PipelineError::combine_failed("no clips present on disk"));
        }

        match concat_copy(&present, output, self.timeout_secs).await {
            Ok(()) => {
                info!(clips = present.len(), "Combined report via stream copy");
                Ok(())
            }
            Err(e) => {
                warn!("Stream-copy concat failed, re-encoding: {}", e);
                concat_reencode(&present, output, &self.encoding, self.timeout_secs)
                    .await
                    .map_err(|e| {
                        PipelineError::combine_failed(format!("re-encode concat: {e}"))
                    })?;
                info!(clips = present.len(), "Combined report via re-encode");
                Ok(())
            }
        }
    }
}
