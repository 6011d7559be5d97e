//! Stage adapters.
//!
//! One adapter per per-item stage, each wrapping its backend tiers behind a
//! uniform contract. Adapters are constructed once per run with their
//! backends and output directory; the coordinator drives them in order.

mod poster;
mod script;
mod video;
mod voice;

pub use poster::PosterStage;
pub use script::ScriptStage;
pub use video::VideoStage;
pub use voice::VoiceStage;

use async_trait::async_trait;

use arxivcast_models::{ReportItem, Stage, StageOutcome};

/// Uniform contract for per-item stages.
///
/// `produce` writes at most one artifact for the item and never returns an
/// error: failures collapse into `StageOutcome::Absent`, so one bad item
/// cannot abort the batch. The coordinator checks `Stage::requires` before
/// dispatching, so adapters may assume their upstream slots are filled.
#[async_trait]
pub trait StageAdapter: Send + Sync {
    /// Which stage this adapter implements.
    fn stage(&self) -> Stage;

    /// Produce this item's artifact, falling back through tiers as needed.
    async fn produce(&self, item: &ReportItem) -> StageOutcome;
}
