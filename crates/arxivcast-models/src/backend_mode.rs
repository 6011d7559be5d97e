//! Backend selection mode.
//!
//! The pipeline has two backend tiers per generative stage: a primary
//! model-backed service and a deterministic local fallback. Which tiers a
//! run may use is decided once, from the CLI, before any item is processed;
//! adapters never probe availability per item.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which backend tiers a run may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendMode {
    /// Try primary backends first, fall back per item on failure.
    #[default]
    Full,

    /// Skip primaries entirely; every stage uses its guaranteed fallback.
    FallbackOnly,
}

impl BackendMode {
    /// Returns the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Full => "full",
            BackendMode::FallbackOnly => "fallback-only",
        }
    }

    /// Returns a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            BackendMode::Full => "Primary backends with per-item fallback",
            BackendMode::FallbackOnly => "Deterministic fallbacks only, no model backends",
        }
    }

    /// Returns true if primary backends should be constructed at all.
    pub fn uses_primary(&self) -> bool {
        matches!(self, BackendMode::Full)
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendMode {
    type Err = BackendModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(BackendMode::Full),
            "fallback-only" | "fallback_only" | "fallback" => Ok(BackendMode::FallbackOnly),
            _ => Err(BackendModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown backend mode: {0}")]
pub struct BackendModeParseError(String);
