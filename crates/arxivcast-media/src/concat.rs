//! Clip concatenation for the combined report.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use arxivcast_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Write an FFmpeg concat-demuxer manifest listing `clips` in order.
///
/// Paths are absolutized so the manifest works regardless of the working
/// directory. The temp file cleans itself up on drop.
pub fn write_concat_manifest(clips: &[PathBuf]) -> MediaResult<NamedTempFile> {
    let mut manifest = NamedTempFile::new()?;
    for clip in clips {
        let abs = clip.canonicalize()?;
        writeln!(manifest, "file '{}'", abs.display())?;
    }
    manifest.flush()?;
    Ok(manifest)
}

/// Build the stream-copy concat command.
pub fn concat_copy_command(manifest: &Path, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with_args(manifest, ["-f", "concat", "-safe", "0"])
        .output_args(["-c", "copy"])
}

/// Build the re-encoding concat command.
pub fn concat_reencode_command(
    manifest: &Path,
    output: &Path,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with_args(manifest, ["-f", "concat", "-safe", "0"])
        .output_args(encoding.to_ffmpeg_args())
}

/// Concatenate `clips` into `output` by stream copy (no re-encode).
///
/// Fast and lossless, but requires every clip to share stream parameters.
pub async fn concat_copy(clips: &[PathBuf], output: &Path, timeout_secs: u64) -> MediaResult<()> {
    if clips.is_empty() {
        return Err(MediaError::invalid_media("no clips to concatenate"));
    }

    let manifest = write_concat_manifest(clips)?;
    debug!("Concat manifest at {} ({} clips)", manifest.path().display(), clips.len());

    let cmd = concat_copy_command(manifest.path(), output);
    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}

/// Concatenate `clips` into `output`, re-encoding with `encoding`.
///
/// Slower than stream copy; used when clips disagree on stream parameters.
pub async fn concat_reencode(
    clips: &[PathBuf],
    output: &Path,
    encoding: &EncodingConfig,
    timeout_secs: u64,
) -> MediaResult<()> {
    if clips.is_empty() {
        return Err(MediaError::invalid_media("no clips to concatenate"));
    }

    let manifest = write_concat_manifest(clips)?;
    let cmd = concat_reencode_command(manifest.path(), output, encoding);
    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}
