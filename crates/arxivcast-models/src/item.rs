//! Report item model.

use std::path::{Path, PathBuf};

use crate::paper::Paper;
use crate::stage::Stage;

/// One paper moving through the pipeline.
///
/// The ordinal is assigned at fetch time (1-based batch position) and never
/// changes; it is baked into every artifact filename so a run's files sort
/// in batch order. The artifact slots start empty and are filled as stages
/// succeed; a slot left `None` means the stage ended `Absent` and everything
/// downstream of it is skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportItem {
    /// 1-based position in the fetched batch
    pub ordinal: usize,

    /// Immutable paper metadata
    pub paper: Paper,

    /// Poster image, if produced
    pub poster: Option<PathBuf>,

    /// Narration script, if produced
    pub script: Option<PathBuf>,

    /// Audio track, if produced
    pub audio: Option<PathBuf>,

    /// Composed clip, if produced
    pub video: Option<PathBuf>,
}

impl ReportItem {
    /// Create an item with empty artifact slots.
    pub fn new(ordinal: usize, paper: Paper) -> Self {
        Self {
            ordinal,
            paper,
            poster: None,
            script: None,
            audio: None,
            video: None,
        }
    }

    /// Artifact slot for a stage. `Fetch` has no per-item artifact.
    pub fn artifact(&self, stage: Stage) -> Option<&Path> {
        match stage {
            Stage::Fetch => None,
            Stage::Poster => self.poster.as_deref(),
            Stage::Script => self.script.as_deref(),
            Stage::Voice => self.audio.as_deref(),
            Stage::Video => self.video.as_deref(),
        }
    }

    /// Record a produced artifact. Setting `Fetch` is a no-op.
    pub fn set_artifact(&mut self, stage: Stage, path: PathBuf) {
        match stage {
            Stage::Fetch => {}
            Stage::Poster => self.poster = Some(path),
            Stage::Script => self.script = Some(path),
            Stage::Voice => self.audio = Some(path),
            Stage::Video => self.video = Some(path),
        }
    }

    /// Returns true when every slot `stage` reads is filled.
    pub fn satisfies(&self, stage: Stage) -> bool {
        stage.requires().iter().all(|s| self.artifact(*s).is_some())
    }

    /// Filename for this item's artifact at `stage`.
    pub fn artifact_file_name(&self, stage: Stage) -> String {
        stage.artifact_file_name(self.ordinal, &self.paper.arxiv_id)
    }
}
