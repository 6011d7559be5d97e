//! Run coordination: fetch a batch, walk every item through the stage
//! chain, combine the surviving clips into the dated report.

use std::path::PathBuf;

use tracing::{error, info, warn};

use arxivcast_models::{ReportItem, Stage, StageOutcome};

use crate::arxiv::{save_batch, PaperSource};
use crate::combiner::ReportCombiner;
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::stages::StageAdapter;

/// Report filename stem, dated per run.
const REPORT_FILE_PREFIX: &str = "daily_arxiv_report";

/// Directory layout for one run.
///
/// Fetch data is undated so every day's batch lands in one `data/`
/// directory; item stages each get a dated subdirectory, so reruns on the
/// same day overwrite and different days never collide.
pub struct RunDirs {
    root: PathBuf,
    pub date: String,
}

impl RunDirs {
    pub fn new(root: impl Into<PathBuf>, date: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            date: date.into(),
        }
    }

    /// Undated batch metadata directory.
    pub fn data(&self) -> PathBuf {
        self.root.join(Stage::Fetch.dir_name())
    }

    /// Artifact directory for a stage. `Fetch` maps to the undated data dir.
    pub fn stage(&self, stage: Stage) -> PathBuf {
        match stage {
            Stage::Fetch => self.data(),
            _ => self.root.join(stage.dir_name()).join(&self.date),
        }
    }

    /// Create the dated directories for every item stage.
    ///
    /// Called only once the fetch produced papers, so an empty run leaves
    /// no stray dated directories behind.
    pub async fn create_stage_dirs(&self) -> PipelineResult<()> {
        for stage in Stage::ITEM_STAGES {
            tokio::fs::create_dir_all(self.stage(*stage)).await?;
        }
        Ok(())
    }
}

/// Counters for a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Papers in the fetched batch
    pub fetched: usize,
    /// Clips that made it into the report
    pub combined: usize,
    /// Items that produced no clip
    pub dropped: usize,
    /// Stage executions that fell back to a degraded tier
    pub degraded_stages: usize,
    /// Final report path
    pub report: PathBuf,
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The report was written.
    Completed(RunSummary),

    /// The feed had no new papers. Not an error.
    NothingToDo,

    /// Papers were fetched but no item produced a clip.
    NoVideos { fetched: usize },

    /// Clips exist but could not be joined; they stay on disk.
    CombineFailed {
        fetched: usize,
        clips: Vec<PathBuf>,
        reason: String,
    },
}

/// Drives one run end to end. Holds borrowed trait objects so tests can
/// swap any collaborator.
pub struct Coordinator<'a> {
    config: &'a PipelineConfig,
    source: &'a dyn PaperSource,
    stages: Vec<&'a dyn StageAdapter>,
    combiner: &'a dyn ReportCombiner,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        source: &'a dyn PaperSource,
        stages: Vec<&'a dyn StageAdapter>,
        combiner: &'a dyn ReportCombiner,
    ) -> Self {
        Self {
            config,
            source,
            stages,
            combiner,
        }
    }

    /// Run the pipeline.
    ///
    /// Only the fetch and the batch save propagate errors; per-item stage
    /// failures degrade or drop that item and the run continues.
    pub async fn run(&self, dirs: &RunDirs) -> PipelineResult<RunOutcome> {
        info!(
            category = %self.config.category,
            max_papers = self.config.max_papers,
            "Fetching latest papers"
        );
        let papers = self
            .source
            .fetch(&self.config.category, self.config.max_papers)
            .await?;

        // The batch file is written even when empty, so a quiet day is
        // distinguishable from a day the pipeline never ran
        let data_path = save_batch(&papers, &dirs.data(), &dirs.date).await?;
        info!(
            count = papers.len(),
            "Saved batch to {}",
            data_path.display()
        );

        if papers.is_empty() {
            return Ok(RunOutcome::NothingToDo);
        }
        dirs.create_stage_dirs().await?;

        let mut items: Vec<ReportItem> = papers
            .into_iter()
            .enumerate()
            .map(|(i, paper)| ReportItem::new(i + 1, paper))
            .collect();

        let mut degraded_stages = 0;
        for item in &mut items {
            self.process_item(item, &mut degraded_stages).await;
        }

        let fetched = items.len();
        let clips: Vec<PathBuf> = items.iter().filter_map(|i| i.video.clone()).collect();
        if clips.is_empty() {
            warn!("No item produced a clip; nothing to combine");
            return Ok(RunOutcome::NoVideos { fetched });
        }

        let report = dirs
            .stage(Stage::Video)
            .join(format!("{}_{}.mp4", REPORT_FILE_PREFIX, dirs.date));
        match self.combiner.combine(&clips, &report).await {
            Ok(()) => {
                let summary = RunSummary {
                    fetched,
                    combined: clips.len(),
                    dropped: fetched - clips.len(),
                    degraded_stages,
                    report,
                };
                info!(
                    combined = summary.combined,
                    dropped = summary.dropped,
                    "Report ready at {}",
                    summary.report.display()
                );
                Ok(RunOutcome::Completed(summary))
            }
            Err(e) => {
                error!("Combine failed, per-item clips kept on disk: {}", e);
                Ok(RunOutcome::CombineFailed {
                    fetched,
                    clips,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Walk one item through the stage chain in order.
    async fn process_item(&self, item: &mut ReportItem, degraded_stages: &mut usize) {
        for adapter in &self.stages {
            let stage = adapter.stage();
            if !item.satisfies(stage) {
                warn!(
                    stage = %stage,
                    "Skipping {}: prerequisite artifact missing", item.paper.arxiv_id
                );
                continue;
            }
            match adapter.produce(item).await {
                StageOutcome::Success(path) => item.set_artifact(stage, path),
                StageOutcome::Degraded(path) => {
                    *degraded_stages += 1;
                    item.set_artifact(stage, path);
                }
                StageOutcome::Absent(reason) => {
                    error!(
                        stage = %stage,
                        "No output for {}: {}", item.paper.arxiv_id, reason
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::arxiv::MockPaperSource;
    use crate::error::PipelineError;

    /// Stage double that succeeds, degrades, or fails by ordinal.
    struct FakeStage {
        stage: Stage,
        dir: PathBuf,
        fail_ordinals: Vec<usize>,
        degrade: bool,
    }

    impl FakeStage {
        fn succeeding(stage: Stage, dirs: &RunDirs) -> Self {
            Self {
                stage,
                dir: dirs.stage(stage),
                fail_ordinals: Vec::new(),
                degrade: false,
            }
        }

        fn degrading(stage: Stage, dirs: &RunDirs) -> Self {
            Self {
                degrade: true,
                ..Self::succeeding(stage, dirs)
            }
        }

        fn failing_for(stage: Stage, dirs: &RunDirs, ordinals: &[usize]) -> Self {
            Self {
                fail_ordinals: ordinals.to_vec(),
                ..Self::succeeding(stage, dirs)
            }
        }
    }

    #[async_trait]
    impl StageAdapter for FakeStage {
        fn stage(&self) -> Stage {
            self.stage
        }

        async fn produce(&self, item: &ReportItem) -> StageOutcome {
            if self.fail_ordinals.contains(&item.ordinal) {
                return StageOutcome::absent("forced failure");
            }
            let path = self.dir.join(item.artifact_file_name(self.stage));
            if self.degrade {
                StageOutcome::Degraded(path)
            } else {
                StageOutcome::Success(path)
            }
        }
    }

    /// Combiner double that records the clips it was handed.
    struct FakeCombiner {
        received: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    impl FakeCombiner {
        fn new() -> Self {
            Self {
                received: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ReportCombiner for FakeCombiner {
        async fn combine(&self, clips: &[PathBuf], _output: &Path) -> PipelineResult<()> {
            *self.received.lock().unwrap() = clips.to_vec();
            if self.fail {
                Err(PipelineError::combine_failed("forced failure"))
            } else {
                Ok(())
            }
        }
    }

    fn sample_papers(n: usize) -> Vec<arxivcast_models::Paper> {
        (1..=n)
            .map(|i| arxivcast_models::Paper {
                title: format!("Paper {i}"),
                authors: vec!["A. Author".to_string()],
                affiliations: vec![String::new()],
                summary: "An abstract.".to_string(),
                published: "2026-08-24".to_string(),
                updated: "2026-08-24".to_string(),
                arxiv_id: format!("2608.0000{i}v1"),
                pdf_url: String::new(),
                primary_category: "cs.AI".to_string(),
                categories: vec!["cs.AI".to_string()],
            })
            .collect()
    }

    fn mock_source(papers: Vec<arxivcast_models::Paper>) -> MockPaperSource {
        let mut source = MockPaperSource::new();
        source.expect_fetch().returning(move |_, _| Ok(papers.clone()));
        source
    }

    #[test]
    fn test_run_dirs_layout() {
        let dirs = RunDirs::new("/out", "2026-08-24");
        assert_eq!(dirs.data(), PathBuf::from("/out/data"));
        assert_eq!(dirs.stage(Stage::Fetch), PathBuf::from("/out/data"));
        assert_eq!(
            dirs.stage(Stage::Poster),
            PathBuf::from("/out/posters/2026-08-24")
        );
        assert_eq!(
            dirs.stage(Stage::Video),
            PathBuf::from("/out/videos/2026-08-24")
        );
    }

    #[tokio::test]
    async fn test_create_stage_dirs() {
        let root = TempDir::new().unwrap();
        let dirs = RunDirs::new(root.path(), "2026-08-24");
        dirs.create_stage_dirs().await.unwrap();

        for stage in Stage::ITEM_STAGES {
            assert!(dirs.stage(*stage).is_dir());
        }
        // Fetch data dir is save_batch's job, not create_stage_dirs'
        assert!(!dirs.data().exists());
    }

    #[tokio::test]
    async fn test_empty_fetch_is_nothing_to_do() {
        let root = TempDir::new().unwrap();
        let dirs = RunDirs::new(root.path(), "2026-08-24");
        let config = PipelineConfig::default();
        let source = mock_source(Vec::new());
        let combiner = FakeCombiner::new();

        let coordinator = Coordinator::new(&config, &source, Vec::new(), &combiner);
        let outcome = coordinator.run(&dirs).await.unwrap();

        assert_eq!(outcome, RunOutcome::NothingToDo);
        // Empty batch is still recorded, but no dated stage dirs appear
        assert!(dirs.data().join("arxiv_papers_2026-08-24.json").is_file());
        assert!(!root.path().join("posters").exists());
        assert!(combiner.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_stages_are_counted() {
        let root = TempDir::new().unwrap();
        let dirs = RunDirs::new(root.path(), "2026-08-24");
        let config = PipelineConfig::default();
        let source = mock_source(sample_papers(1));
        let combiner = FakeCombiner::new();

        let poster = FakeStage::degrading(Stage::Poster, &dirs);
        let script = FakeStage::degrading(Stage::Script, &dirs);
        let voice = FakeStage::succeeding(Stage::Voice, &dirs);
        let video = FakeStage::succeeding(Stage::Video, &dirs);
        let stages: Vec<&dyn StageAdapter> = vec![&poster, &script, &voice, &video];

        let coordinator = Coordinator::new(&config, &source, stages, &combiner);
        let outcome = coordinator.run(&dirs).await.unwrap();

        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.fetched, 1);
                assert_eq!(summary.combined, 1);
                assert_eq!(summary.dropped, 0);
                assert_eq!(summary.degraded_stages, 2);
            }
            other => panic!("expected completed run, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_stage_skips_downstream() {
        let root = TempDir::new().unwrap();
        let dirs = RunDirs::new(root.path(), "2026-08-24");
        let config = PipelineConfig::default();
        let source = mock_source(sample_papers(2));
        let combiner = FakeCombiner::new();

        // Script fails for item 1, so its voice and video never run
        let poster = FakeStage::succeeding(Stage::Poster, &dirs);
        let script = FakeStage::failing_for(Stage::Script, &dirs, &[1]);
        let voice = FakeStage::succeeding(Stage::Voice, &dirs);
        let video = FakeStage::succeeding(Stage::Video, &dirs);
        let stages: Vec<&dyn StageAdapter> = vec![&poster, &script, &voice, &video];

        let coordinator = Coordinator::new(&config, &source, stages, &combiner);
        let outcome = coordinator.run(&dirs).await.unwrap();

        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.fetched, 2);
                assert_eq!(summary.combined, 1);
                assert_eq!(summary.dropped, 1);
            }
            other => panic!("expected completed run, got {other:?}"),
        }
        let received = combiner.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0]
            .to_str()
            .unwrap()
            .contains("video_02_2608.00002v1"));
    }

    #[tokio::test]
    async fn test_combine_failure_keeps_clips() {
        let root = TempDir::new().unwrap();
        let dirs = RunDirs::new(root.path(), "2026-08-24");
        let config = PipelineConfig::default();
        let source = mock_source(sample_papers(1));
        let combiner = FakeCombiner::failing();

        let poster = FakeStage::succeeding(Stage::Poster, &dirs);
        let script = FakeStage::succeeding(Stage::Script, &dirs);
        let voice = FakeStage::succeeding(Stage::Voice, &dirs);
        let video = FakeStage::succeeding(Stage::Video, &dirs);
        let stages: Vec<&dyn StageAdapter> = vec![&poster, &script, &voice, &video];

        let coordinator = Coordinator::new(&config, &source, stages, &combiner);
        let outcome = coordinator.run(&dirs).await.unwrap();

        match outcome {
            RunOutcome::CombineFailed {
                fetched,
                clips,
                reason,
            } => {
                assert_eq!(fetched, 1);
                assert_eq!(clips.len(), 1);
                assert!(reason.contains("forced failure"));
            }
            other => panic!("expected combine failure, got {other:?}"),
        }
    }
}
