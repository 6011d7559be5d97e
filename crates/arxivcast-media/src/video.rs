//! Still-image clip composition.

use std::path::Path;
use tracing::info;

use arxivcast_models::encoding::{POSTER_HEIGHT, POSTER_WIDTH};
use arxivcast_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Build the scale/pad filter pinning every clip to the poster frame size.
///
/// Posters from the generative backend are requested at the right size but
/// not guaranteed; normalizing here keeps all clips concat-compatible.
fn build_frame_filter() -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
        w = POSTER_WIDTH,
        h = POSTER_HEIGHT,
    )
}

/// Build the slide composition command: loop the poster for as long as the
/// audio runs.
pub fn slide_video_command(
    poster: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input_with_args(poster, ["-loop", "1"])
        .input(audio)
        .video_filter(build_frame_filter())
        .output_args(encoding.to_ffmpeg_args())
        .output_args(["-tune", "stillimage", "-shortest"])
}

/// Compose one poster and one audio track into a clip whose duration
/// matches the audio.
pub async fn compose_slide_video(
    poster: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
    encoding: &EncodingConfig,
    timeout_secs: u64,
) -> MediaResult<()> {
    let poster = poster.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    if !poster.exists() {
        return Err(MediaError::FileNotFound(poster.to_path_buf()));
    }
    if !audio.exists() {
        return Err(MediaError::FileNotFound(audio.to_path_buf()));
    }

    info!(
        "Composing clip: {} + {} -> {}",
        poster.display(),
        audio.display(),
        output.display()
    );

    let cmd = slide_video_command(poster, audio, output, encoding);
    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}
