//! Stage outcome type.

use std::path::{Path, PathBuf};

/// Result of running one stage for one item.
///
/// Stage adapters never surface errors to the coordinator; every failure
/// collapses into `Absent` with a reason, so a single bad item cannot abort
/// the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The primary backend produced the artifact.
    Success(PathBuf),

    /// A fallback tier produced the artifact; usable but lower fidelity.
    Degraded(PathBuf),

    /// Every tier failed. The reason is for logs only; downstream stages
    /// that need this artifact are skipped for the item.
    Absent(String),
}

impl StageOutcome {
    /// Shorthand for an `Absent` outcome.
    pub fn absent(reason: impl Into<String>) -> Self {
        StageOutcome::Absent(reason.into())
    }

    /// Artifact path, if one was produced.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StageOutcome::Success(path) | StageOutcome::Degraded(path) => Some(path),
            StageOutcome::Absent(_) => None,
        }
    }

    /// Returns true if no artifact was produced.
    pub fn is_absent(&self) -> bool {
        matches!(self, StageOutcome::Absent(_))
    }

    /// Returns true if a fallback tier produced the artifact.
    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutcome::Degraded(_))
    }
}
