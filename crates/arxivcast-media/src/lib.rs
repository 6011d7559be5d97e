#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the arxivcast pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with bounded runtimes
//! - Duration and stream probing via FFprobe
//! - Template poster rendering (lavfi canvas + drawtext)
//! - Silent-WAV generation for the terminal voice fallback
//! - Still-image clip composition and report concatenation

pub mod audio;
pub mod command;
pub mod concat;
pub mod error;
pub mod poster;
pub mod probe;
pub mod video;

// Re-export common types
pub use audio::{looks_like_wav, wav_duration, write_silence_wav};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use concat::{concat_copy, concat_reencode};
pub use error::{MediaError, MediaResult};
pub use poster::render_text_poster;
pub use probe::{media_duration, probe_media, MediaInfo};
pub use video::compose_slide_video;
