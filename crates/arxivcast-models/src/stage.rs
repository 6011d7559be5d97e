//! Pipeline stage definitions and artifact naming.
//!
//! The pipeline runs five stages in a fixed order:
//!
//! - `Fetch`: query the arXiv export API once per run
//! - `Poster`: one image per paper
//! - `Script`: one narration text per paper
//! - `Voice`: one audio track per paper
//! - `Video`: one composed clip per paper
//!
//! Every item-stage artifact is named `{prefix}_{ordinal:02}_{id}.{ext}`,
//! which keeps files unique within a run and lexically sorted in batch
//! order.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::paper::sanitize_id;

/// One pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Batch metadata fetch; runs once per run, not per item.
    Fetch,

    /// Poster image generation.
    Poster,

    /// Narration script drafting.
    Script,

    /// Speech synthesis.
    Voice,

    /// Per-paper clip composition.
    Video,
}

impl Stage {
    /// Per-item stages in execution order.
    pub const ITEM_STAGES: &'static [Stage] =
        &[Stage::Poster, Stage::Script, Stage::Voice, Stage::Video];

    /// Returns the stage name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Poster => "poster",
            Stage::Script => "script",
            Stage::Voice => "voice",
            Stage::Video => "video",
        }
    }

    /// Directory name for this stage's artifacts under the output root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Stage::Fetch => "data",
            Stage::Poster => "posters",
            Stage::Script => "scripts",
            Stage::Voice => "audios",
            Stage::Video => "videos",
        }
    }

    /// Artifact filename prefix.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Stage::Fetch => "arxiv_papers",
            Stage::Poster => "poster",
            Stage::Script => "script",
            Stage::Voice => "audio",
            Stage::Video => "video",
        }
    }

    /// Artifact file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Stage::Fetch => "json",
            Stage::Poster => "png",
            Stage::Script => "txt",
            Stage::Voice => "wav",
            Stage::Video => "mp4",
        }
    }

    /// Upstream artifact slots this stage reads.
    ///
    /// Poster and Script run from metadata alone; Voice reads the script;
    /// Video reads the poster and the audio track.
    pub fn requires(&self) -> &'static [Stage] {
        match self {
            Stage::Voice => &[Stage::Script],
            Stage::Video => &[Stage::Poster, Stage::Voice],
            _ => &[],
        }
    }

    /// Artifact filename for one item: `{prefix}_{ordinal:02}_{id}.{ext}`.
    pub fn artifact_file_name(&self, ordinal: usize, arxiv_id: &str) -> String {
        format!(
            "{}_{:02}_{}.{}",
            self.file_prefix(),
            ordinal,
            sanitize_id(arxiv_id),
            self.extension()
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fetch" => Ok(Stage::Fetch),
            "poster" => Ok(Stage::Poster),
            "script" => Ok(Stage::Script),
            "voice" | "audio" => Ok(Stage::Voice),
            "video" => Ok(Stage::Video),
            _ => Err(StageParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown stage: {0}")]
pub struct StageParseError(String);
