//! Voice stage adapter.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use arxivcast_media::{wav_duration, write_silence_wav};
use arxivcast_models::encoding::{FALLBACK_SAMPLE_RATE, FALLBACK_SILENCE_SECS};
use arxivcast_models::{ReportItem, Stage, StageOutcome};

use crate::stages::StageAdapter;
use crate::tts::{os_tts, TtsClient};

/// Voice stage: HTTP TTS, then the OS speech command, then silence.
///
/// Silence is the terminal tier so an item with a poster always reaches the
/// video stage with some audio track.
pub struct VoiceStage {
    tts: Option<TtsClient>,
    dir: PathBuf,
    os_tts_timeout: Duration,
}

impl VoiceStage {
    /// Create the adapter. `tts` is `None` in fallback-only runs.
    pub fn new(tts: Option<TtsClient>, dir: PathBuf, os_tts_timeout: Duration) -> Self {
        Self {
            tts,
            dir,
            os_tts_timeout,
        }
    }
}

#[async_trait]
impl StageAdapter for VoiceStage {
    fn stage(&self) -> Stage {
        Stage::Voice
    }

    async fn produce(&self, item: &ReportItem) -> StageOutcome {
        let Some(script_path) = item.artifact(Stage::Script) else {
            return StageOutcome::absent("no script artifact to narrate");
        };
        let script = match tokio::fs::read_to_string(script_path).await {
            Ok(text) => text,
            Err(e) => return StageOutcome::absent(format!("script unreadable: {e}")),
        };

        let path = self.dir.join(item.artifact_file_name(Stage::Voice));

        if let Some(client) = &self.tts {
            match client.synthesize(&script).await {
                Ok(bytes) => match tokio::fs::write(&path, &bytes).await {
                    Ok(()) => {
                        info!("Synthesized narration for {}", item.paper.arxiv_id);
                        return StageOutcome::Success(path);
                    }
                    Err(e) => {
                        warn!("Failed to write audio for {}: {}", item.paper.arxiv_id, e)
                    }
                },
                Err(e) => warn!("TTS backend failed for {}: {}", item.paper.arxiv_id, e),
            }
        }

        // OS speech command tier, bounded so a hung synthesizer cannot
        // stall the whole batch
        match tokio::time::timeout(self.os_tts_timeout, os_tts(&script, &path)).await {
            // Accept only a readable, non-empty track; a truncated file
            // falls through to the silence tier
            Ok(Ok(())) => match wav_duration(&path) {
                Ok(secs) if secs > 0.0 => return StageOutcome::Degraded(path),
                Ok(_) => warn!("OS TTS wrote an empty track for {}", item.paper.arxiv_id),
                Err(e) => warn!(
                    "OS TTS output unreadable for {}: {}",
                    item.paper.arxiv_id, e
                ),
            },
            Ok(Err(e)) => warn!("OS TTS failed for {}: {}", item.paper.arxiv_id, e),
            Err(_) => warn!(
                "OS TTS timed out after {:?} for {}",
                self.os_tts_timeout, item.paper.arxiv_id
            ),
        }

        match write_silence_wav(&path, FALLBACK_SILENCE_SECS, FALLBACK_SAMPLE_RATE) {
            Ok(()) => {
                warn!("Using silence track for {}", item.paper.arxiv_id);
                StageOutcome::Degraded(path)
            }
            Err(e) => StageOutcome::absent(format!("silence fallback: {e}")),
        }
    }
}
