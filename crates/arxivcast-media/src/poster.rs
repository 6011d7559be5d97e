//! Template poster rendering.
//!
//! The guaranteed tier of the poster stage: a flat portrait canvas with the
//! laid-out paper text drawn on it. Rendering goes through FFmpeg's lavfi
//! `color` source and `drawtext`, so no font rasterization happens
//! in-process and the output matches the frame size every clip expects.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use arxivcast_models::encoding::{POSTER_HEIGHT, POSTER_WIDTH};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Canvas background (AliceBlue).
const CANVAS_COLOR: &str = "0xF0F8FF";
/// Text color on the canvas.
const TEXT_COLOR: &str = "black";
/// Font size in pixels.
const FONT_SIZE: u32 = 16;
/// Left margin in pixels.
const MARGIN_X: u32 = 20;
/// Top margin in pixels.
const MARGIN_Y: u32 = 30;
/// Extra pixels between lines.
const LINE_SPACING: u32 = 9;
/// Bound on the single-frame render.
const RENDER_TIMEOUT_SECS: u64 = 60;

/// Build the lavfi source spec for the blank canvas.
pub fn build_canvas_source() -> String {
    format!("color=c={}:s={}x{}", CANVAS_COLOR, POSTER_WIDTH, POSTER_HEIGHT)
}

/// Build the drawtext filter reading pre-wrapped text from `textfile`.
///
/// Going through a file sidesteps filter escaping for titles containing
/// quotes, colons or commas.
pub fn build_poster_filter(textfile: &Path) -> String {
    format!(
        "drawtext=textfile={}:fontcolor={}:fontsize={}:x={}:y={}:line_spacing={}",
        textfile.display(),
        TEXT_COLOR,
        FONT_SIZE,
        MARGIN_X,
        MARGIN_Y,
        LINE_SPACING,
    )
}

/// Render pre-wrapped `text` onto a blank portrait canvas as a single PNG.
pub async fn render_text_poster(text: &str, output: impl AsRef<Path>) -> MediaResult<()> {
    let output = output.as_ref();

    // Temp file must outlive the FFmpeg run
    let mut textfile = NamedTempFile::new()?;
    textfile.write_all(text.as_bytes())?;
    textfile.flush()?;

    debug!("Rendering template poster to {}", output.display());

    let cmd = FfmpegCommand::new(output)
        .input_with_args(build_canvas_source(), ["-f", "lavfi"])
        .video_filter(build_poster_filter(textfile.path()))
        .single_frame();

    FfmpegRunner::new()
        .with_timeout(RENDER_TIMEOUT_SECS)
        .run(&cmd)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_canvas_source_has_portrait_size() {
        let source = build_canvas_source();
        assert!(source.starts_with("color=c=0xF0F8FF"));
        assert!(source.contains("512x768"));
    }

    #[test]
    fn test_poster_filter_reads_textfile() {
        let filter = build_poster_filter(&PathBuf::from("/tmp/poster_text.txt"));
        assert!(filter.starts_with("drawtext=textfile=/tmp/poster_text.txt"));
        assert!(filter.contains("fontcolor=black"));
        assert!(filter.contains("fontsize=16"));
        assert!(filter.contains("line_spacing=9"));
    }

    #[test]
    fn test_poster_command_shape() {
        let cmd = FfmpegCommand::new("poster.png")
            .input_with_args(build_canvas_source(), ["-f", "lavfi"])
            .video_filter(build_poster_filter(&PathBuf::from("t.txt")))
            .single_frame();

        let args = cmd.build_args();
        assert!(args.contains(&"-f".to_string()));
        assert!(args.contains(&"lavfi".to_string()));
        assert!(args.contains(&"-frames:v".to_string()));
        assert_eq!(args.last(), Some(&"poster.png".to_string()));
    }
}
