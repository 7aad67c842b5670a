//! FFmpeg-backed runner implementation.

use regex_lite::Regex;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::job::JobSpec;
use crate::preset::Preset;

use super::config::RunnerConfig;
use super::error::RunnerError;
use super::traits::{JobRunner, ProgressUpdate};

/// Substring that marks a per-frame status line in the encoder output.
const FRAME_MARKER: &str = "frame=";

/// Runner that shells out to ffmpeg.
pub struct FfmpegRunner {
    config: RunnerConfig,
}

impl FfmpegRunner {
    /// Creates a new runner with the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Creates a runner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RunnerConfig::default())
    }

    fn build_args(spec: &JobSpec, preset: &Preset) -> Vec<String> {
        preset.args(&spec.input_path, &spec.output_path)
    }

    /// Extracts a status message from a frame-marker line.
    ///
    /// The marker itself is the progress tick; the frame counter is parsed
    /// out only to give the consumer something readable.
    fn frame_message(frame_re: Option<&Regex>, line: &str) -> String {
        frame_re
            .and_then(|re| re.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| format!("frame {}", m.as_str()))
            .unwrap_or_else(|| "processing".to_string())
    }
}

#[async_trait::async_trait]
impl JobRunner for FfmpegRunner {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn execute(
        &self,
        spec: &JobSpec,
        preset: &Preset,
        progress: mpsc::Sender<ProgressUpdate>,
    ) -> Result<(), RunnerError> {
        let args = Self::build_args(spec, preset);
        debug!(job_id = %spec.id, tool = %self.config.tool_path.display(), ?args, "spawning encoder");

        let mut child = Command::new(&self.config.tool_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Launch {
                tool: self.config.tool_path.clone(),
                source,
            })?;

        let stdout = child.stdout.take().expect("stdout should be captured");
        let stderr = child.stderr.take().expect("stderr should be captured");
        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();
        let mut out_done = false;
        let mut err_done = false;

        let frame_re = Regex::new(r"frame=\s*(\d+)").ok();
        let parse_progress = preset.reports_frame_progress();
        let mut fraction: f32 = 0.0;

        // The encoder writes status lines to stderr and some muxers chatter
        // on stdout; both streams feed the same line handler so the tick
        // heuristic sees the combined output.
        loop {
            let next = tokio::select! {
                res = out_lines.next_line(), if !out_done => (res, true),
                res = err_lines.next_line(), if !err_done => (res, false),
                else => break,
            };

            match next {
                (Ok(Some(line)), _) => {
                    if parse_progress && line.contains(FRAME_MARKER) {
                        fraction = (fraction + self.config.progress_increment).min(1.0);
                        let update = ProgressUpdate {
                            fraction,
                            message: Self::frame_message(frame_re.as_ref(), &line),
                        };
                        let _ = progress.send(update).await;
                    }
                }
                (Ok(None), true) => out_done = true,
                (Ok(None), false) => err_done = true,
                (Err(e), _) => {
                    let _ = child.kill().await;
                    return Err(RunnerError::Stream(e));
                }
            }
        }

        let status = child.wait().await.map_err(RunnerError::Stream)?;
        if status.success() {
            Ok(())
        } else {
            Err(RunnerError::NonZeroExit(status.code().unwrap_or(-1)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_spec() -> JobSpec {
        JobSpec::new("/in/movie.mkv", "/out/movie.mp4", "Remove Audio")
    }

    #[test]
    fn test_build_args_matches_template() {
        let spec = test_spec();
        let args = FfmpegRunner::build_args(&spec, &Preset::RemoveAudio);
        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/in/movie.mkv");
        assert!(args.contains(&"-an".to_string()));
        assert_eq!(args.last().unwrap(), "/out/movie.mp4");
    }

    #[test]
    fn test_frame_message_extracts_counter() {
        let re = Regex::new(r"frame=\s*(\d+)").ok();
        let line = "frame=  250 fps= 48 q=28.0 size=    1024KiB time=00:00:10.41";
        assert_eq!(FfmpegRunner::frame_message(re.as_ref(), line), "frame 250");
    }

    #[test]
    fn test_frame_message_falls_back_on_odd_lines() {
        let re = Regex::new(r"frame=\s*(\d+)").ok();
        assert_eq!(
            FfmpegRunner::frame_message(re.as_ref(), "frame=garbage"),
            "processing"
        );
    }

    #[tokio::test]
    async fn test_missing_tool_is_launch_error() {
        let runner = FfmpegRunner::new(RunnerConfig::with_tool_path(PathBuf::from(
            "/nonexistent/clipforge-test-tool",
        )));
        let (tx, _rx) = mpsc::channel(8);

        let result = runner
            .execute(&test_spec(), &Preset::RemoveAudio, tx)
            .await;
        assert!(matches!(result, Err(RunnerError::Launch { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_success() {
        // `true` ignores its arguments and exits 0, standing in for a
        // successful encoder run with no output.
        let runner = FfmpegRunner::new(RunnerConfig::with_tool_path(PathBuf::from("true")));
        let (tx, _rx) = mpsc::channel(8);

        let result = runner
            .execute(&test_spec(), &Preset::RemoveAudio, tx)
            .await;
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_mapped() {
        let runner = FfmpegRunner::new(RunnerConfig::with_tool_path(PathBuf::from("false")));
        let (tx, _rx) = mpsc::channel(8);

        let result = runner
            .execute(&test_spec(), &Preset::RemoveAudio, tx)
            .await;
        assert!(matches!(result, Err(RunnerError::NonZeroExit(1))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_frame_lines_drive_progress() {
        use std::os::unix::fs::PermissionsExt;

        // A shell script emitting marker lines stands in for the encoder.
        // It ignores the argument vector and exits 0.
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-encoder.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nfor i in 1 2 3 4; do echo \"frame=  $i fps=0\"; done\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner =
            FfmpegRunner::new(RunnerConfig::with_tool_path(script).with_progress_increment(0.25));
        let (tx, mut rx) = mpsc::channel(16);

        let result = runner
            .execute(&test_spec(), &Preset::RemoveAudio, tx)
            .await;
        assert!(result.is_ok());

        let mut fractions = Vec::new();
        while let Ok(update) = rx.try_recv() {
            fractions.push(update.fraction);
        }
        assert_eq!(fractions.len(), 4);
        assert_eq!(*fractions.last().unwrap(), 1.0);
        for pair in fractions.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
