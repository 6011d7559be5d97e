//! Video stage adapter.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use arxivcast_media::{compose_slide_video, media_duration};
use arxivcast_models::{EncodingConfig, ReportItem, Stage, StageOutcome};

use crate::stages::StageAdapter;

/// Video stage: one still-poster slide per item, audio track underneath.
///
/// No fallback tier of its own. A failed encode marks the item absent and
/// the combiner simply never sees it.
pub struct VideoStage {
    dir: PathBuf,
    encoding: EncodingConfig,
    ffmpeg_timeout_secs: u64,
}

impl VideoStage {
    pub fn new(dir: PathBuf, encoding: EncodingConfig, ffmpeg_timeout_secs: u64) -> Self {
        Self {
            dir,
            encoding,
            ffmpeg_timeout_secs,
        }
    }
}

#[async_trait]
impl StageAdapter for VideoStage {
    fn stage(&self) -> Stage {
        Stage::Video
    }

    async fn produce(&self, item: &ReportItem) -> StageOutcome {
        let (Some(poster), Some(audio)) =
            (item.artifact(Stage::Poster), item.artifact(Stage::Voice))
        else {
            return StageOutcome::absent("missing poster or audio artifact");
        };

        let path = self.dir.join(item.artifact_file_name(Stage::Video));
        match compose_slide_video(poster, audio, &path, &self.encoding, self.ffmpeg_timeout_secs)
            .await
        {
            Ok(()) => {
                match media_duration(&path).await {
                    Ok(secs) => info!(
                        duration_secs = secs,
                        "Composed clip for {}", item.paper.arxiv_id
                    ),
                    Err(e) => debug!("Could not probe composed clip: {}", e),
                }
                StageOutcome::Success(path)
            }
            Err(e) => StageOutcome::absent(format!("slide video: {e}")),
        }
    }
}
