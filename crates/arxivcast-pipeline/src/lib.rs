//! Daily arXiv video digest pipeline.
//!
//! One run fetches the latest papers for a category, produces a poster,
//! narration script, audio track and slide clip per paper, then joins the
//! clips into a single dated report video. Generative backends are optional
//! at every stage; when one is down the stage falls back to a deterministic
//! tier and the run keeps going.

pub mod arxiv;
pub mod combiner;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod imagegen;
pub mod ollama;
pub mod stages;
pub mod tts;

pub use arxiv::{save_batch, ArxivClient, PaperSource};
pub use combiner::{FfmpegCombiner, ReportCombiner};
pub use config::PipelineConfig;
pub use coordinator::{Coordinator, RunDirs, RunOutcome, RunSummary};
pub use error::{PipelineError, PipelineResult};
pub use imagegen::ImageGenClient;
pub use ollama::OllamaClient;
pub use stages::{PosterStage, ScriptStage, StageAdapter, VideoStage, VoiceStage};
pub use tts::TtsClient;

use arxivcast_models::Stage;

/// Assemble the production collaborators and run today's pipeline.
///
/// Fails fast with a config error when ffmpeg is missing, before any
/// network call. Backend clients are only constructed in `full` mode;
/// `fallback-only` runs wire every stage to its offline tier.
pub async fn run_pipeline(config: &PipelineConfig) -> PipelineResult<RunOutcome> {
    arxivcast_media::check_ffmpeg().map_err(|e| error::PipelineError::config_error(e.to_string()))?;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let dirs = RunDirs::new(&config.output_dir, date);

    let source = ArxivClient::new(&config.arxiv_url, config.fetch_timeout)?;

    let use_primary = config.backend_mode.uses_primary();
    let imagegen = use_primary
        .then(|| ImageGenClient::new(&config.image_url, config.backend_timeout))
        .transpose()?;
    let ollama = use_primary
        .then(|| {
            OllamaClient::new(
                &config.ollama_url,
                &config.ollama_model,
                config.backend_timeout,
            )
        })
        .transpose()?;
    let tts = use_primary
        .then(|| TtsClient::new(&config.tts_url, config.backend_timeout))
        .transpose()?;

    let poster = PosterStage::new(imagegen, dirs.stage(Stage::Poster));
    let script = ScriptStage::new(ollama, dirs.stage(Stage::Script));
    let voice = VoiceStage::new(tts, dirs.stage(Stage::Voice), config.backend_timeout);
    let video = VideoStage::new(
        dirs.stage(Stage::Video),
        config.encoding.clone(),
        config.ffmpeg_timeout_secs,
    );
    let combiner = FfmpegCombiner::new(config.encoding.clone(), config.ffmpeg_timeout_secs);

    let stages: Vec<&dyn StageAdapter> = vec![&poster, &script, &voice, &video];
    let coordinator = Coordinator::new(config, &source, stages, &combiner);
    coordinator.run(&dirs).await
}
