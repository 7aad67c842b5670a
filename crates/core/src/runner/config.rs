//! Configuration for the runner module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ffmpeg-backed runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Path to the ffmpeg binary.
    #[serde(default = "default_tool_path")]
    pub tool_path: PathBuf,

    /// How much a single frame-marker line advances the progress fraction.
    ///
    /// The default of 0.01 maps one marker line to one step of a 0-100
    /// display bar. The resulting fraction is clamped to 1.0.
    #[serde(default = "default_progress_increment")]
    pub progress_increment: f32,
}

fn default_tool_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_progress_increment() -> f32 {
    0.01
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tool_path: default_tool_path(),
            progress_increment: default_progress_increment(),
        }
    }
}

impl RunnerConfig {
    /// Creates a config pointing at a custom tool binary.
    pub fn with_tool_path(tool_path: PathBuf) -> Self {
        Self {
            tool_path,
            ..Default::default()
        }
    }

    /// Sets the per-marker progress increment.
    pub fn with_progress_increment(mut self, increment: f32) -> Self {
        self.progress_increment = increment;
        self
    }
}
