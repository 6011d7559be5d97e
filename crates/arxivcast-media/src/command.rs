//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// How many trailing stderr lines to keep on failure.
const STDERR_TAIL_LINES: usize = 8;

/// One FFmpeg input: the source plus the arguments that precede its `-i`.
#[derive(Debug, Clone)]
struct FfmpegInput {
    /// Arguments placed before `-i` (`-loop 1`, `-f concat`, ...)
    args: Vec<String>,
    /// Input path, or a demuxer spec such as a lavfi source
    source: PathBuf,
}

/// Builder for FFmpeg commands.
///
/// Commands may have several inputs; each keeps its own input-side
/// arguments. Output arguments apply to the single output file.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Inputs in order
    inputs: Vec<FfmpegInput>,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after the inputs)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command writing to `output`.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input with no input-side arguments.
    pub fn input(self, source: impl AsRef<Path>) -> Self {
        self.input_with_args(source, Vec::<String>::new())
    }

    /// Add an input preceded by its own arguments.
    pub fn input_with_args<I, S>(mut self, source: impl AsRef<Path>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(FfmpegInput {
            args: args.into_iter().map(Into::into).collect(),
            source: source.as_ref().to_path_buf(),
        });
        self
    }

    /// Add an output argument.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Emit a single frame.
    pub fn single_frame(self) -> Self {
        self.output_arg("-frames:v").output_arg("1")
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // Overwrite flag
        if self.overwrite {
            args.push("-y".to_string());
        }

        // Log level
        args.push("-v".to_string());
        args.push(self.log_level.clone());

        // Inputs, each with its own preceding args
        for input in &self.inputs {
            args.extend(input.args.clone());
            args.push("-i".to_string());
            args.push(input.source.to_string_lossy().to_string());
        }

        // Output args
        args.extend(self.output_args.clone());

        // Output file
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with a bounded runtime.
pub struct FfmpegRunner {
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self { timeout_secs: None }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        // Check FFmpeg exists
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take().expect("stderr not captured");
        let mut reader = BufReader::new(stderr).lines();

        // Collect stderr so failures carry diagnostics
        let stderr_handle = tokio::spawn(async move {
            let mut lines = Vec::new();
            while let Ok(Some(line)) = reader.next_line().await {
                lines.push(line);
            }
            lines
        });

        let status = self.wait_for_completion(&mut child).await;
        let stderr_lines = stderr_handle.await.unwrap_or_default();

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(stderr_tail(&stderr_lines)),
                status.code(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Wait for the child process, killing it on timeout.
    async fn wait_for_completion(&self, child: &mut Child) -> MediaResult<ExitStatus> {
        let wait_future = child.wait();

        if let Some(timeout_secs) = self.timeout_secs {
            let timeout = tokio::time::timeout(
                std::time::Duration::from_secs(timeout_secs),
                wait_future,
            );
            match timeout.await {
                Ok(result) => Ok(result?),
                Err(_) => {
                    warn!("FFmpeg timed out after {} seconds, killing process", timeout_secs);
                    let _ = child.kill().await;
                    Err(MediaError::Timeout(timeout_secs))
                }
            }
        } else {
            Ok(wait_future.await?)
        }
    }
}

/// Last few stderr lines, enough to diagnose without hauling full logs.
fn stderr_tail(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = FfmpegCommand::new("output.mp4")
            .input("input.mp4")
            .output_arg("-c:v")
            .output_arg("libx264");

        let args = cmd.build_args();
        assert!(args.contains(&"-y".to_string()));
        assert!(args.contains(&"-i".to_string()));
        assert!(args.contains(&"input.mp4".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args.last(), Some(&"output.mp4".to_string()));
    }

    #[test]
    fn test_input_args_precede_their_input() {
        let cmd = FfmpegCommand::new("out.mp4")
            .input_with_args("poster.png", ["-loop", "1"])
            .input("audio.wav");

        let args = cmd.build_args();
        let loop_pos = args.iter().position(|a| a == "-loop").unwrap();
        let first_i = args.iter().position(|a| a == "-i").unwrap();
        assert!(loop_pos < first_i);

        // Second input has no input-side args
        let audio_pos = args.iter().position(|a| a == "audio.wav").unwrap();
        assert_eq!(args[audio_pos - 1], "-i");
    }

    #[test]
    fn test_concat_style_command() {
        let cmd = FfmpegCommand::new("report.mp4")
            .input_with_args("list.txt", ["-f", "concat", "-safe", "0"])
            .output_args(["-c", "copy"]);

        let args = cmd.build_args();
        let f_pos = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f_pos + 1], "concat");
        let safe_pos = args.iter().position(|a| a == "-safe").unwrap();
        assert_eq!(args[safe_pos + 1], "0");
        assert!(args.contains(&"copy".to_string()));
    }

    #[test]
    fn test_single_frame_and_filter() {
        let cmd = FfmpegCommand::new("poster.png")
            .input_with_args("color=c=white:s=512x768", ["-f", "lavfi"])
            .video_filter("drawtext=textfile=t.txt")
            .single_frame();

        let args = cmd.build_args();
        assert!(args.contains(&"lavfi".to_string()));
        assert!(args.contains(&"-vf".to_string()));
        assert!(args.contains(&"-frames:v".to_string()));
        assert!(args.contains(&"1".to_string()));
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let lines: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
        let tail = stderr_tail(&lines);
        assert!(tail.starts_with("line 12"));
        assert!(tail.ends_with("line 19"));
    }
}
