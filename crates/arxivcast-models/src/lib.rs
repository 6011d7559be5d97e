//! Shared data models for the arxivcast pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Paper metadata fetched from the arXiv export API
//! - Report items and their per-stage artifact slots
//! - Pipeline stages and deterministic artifact naming
//! - Stage outcomes (success / degraded / absent)
//! - Encoding configuration shared by every clip and the combined report

pub mod backend_mode;
pub mod encoding;
pub mod item;
pub mod outcome;
pub mod paper;
pub mod stage;

// Re-export common types
pub use backend_mode::{BackendMode, BackendModeParseError};
pub use encoding::EncodingConfig;
pub use item::ReportItem;
pub use outcome::StageOutcome;
pub use paper::{sanitize_id, Paper};
pub use stage::{Stage, StageParseError};
