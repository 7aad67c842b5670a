//! Types for the job module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Input container extensions the runner accepts, lowercase.
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov"];

/// Returns true if the path has a supported video container extension.
///
/// The check is case-insensitive and looks only at the extension; it does
/// not open the file.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_INPUT_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Unique identifier for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Immutable description of one transcode request.
///
/// Once submitted to the dispatcher a spec is never modified. The preset is
/// carried as its string tag; the dispatcher resolves it against the preset
/// catalog at submission and rejects unknown tags before any queue state is
/// touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Unique job id. Resubmitting an id the dispatcher has already seen is
    /// a caller error.
    pub id: JobId,
    /// Source media file.
    pub input_path: PathBuf,
    /// Destination file. Must differ from `input_path`; the dispatcher does
    /// not create parent directories, that is the caller's responsibility.
    pub output_path: PathBuf,
    /// Preset tag, e.g. `"Remove Audio"`.
    pub preset_tag: String,
}

impl JobSpec {
    /// Creates a spec with a freshly generated id.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        preset_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: JobId::new(),
            input_path: input_path.into(),
            output_path: output_path.into(),
            preset_tag: preset_tag.into(),
        }
    }

    /// Replaces the generated id. Mainly useful in tests.
    pub fn with_id(mut self, id: JobId) -> Self {
        self.id = id;
        self
    }
}

/// Lifecycle phase of a job.
///
/// Transitions are strictly `Queued → Running → {Completed | Failed}`.
/// There are no retries and no re-queueing; `Completed` and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobPhase {
    /// Whether no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Exit outcome of a finished job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The external process exited with code 0.
    Success,
    /// The job failed; the reason is a human-readable string.
    Failure { reason: String },
}

/// Mutable lifecycle record for one job.
///
/// Owned exclusively by the dispatcher; consumers receive snapshots and must
/// not treat them as live views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    /// Id of the job this state belongs to.
    pub job_id: JobId,
    /// Current phase.
    pub phase: JobPhase,
    /// Progress fraction in `[0, 1]`, monotonically non-decreasing within a
    /// job. A heuristic proxy, not frame-accurate.
    pub progress: f32,
    /// Last human-readable status message.
    pub message: String,
    /// Exit outcome; absent until the job reaches a terminal phase.
    pub outcome: Option<JobOutcome>,
}

impl JobState {
    /// Creates the initial queued state for a job.
    pub fn queued(job_id: JobId) -> Self {
        Self {
            job_id,
            phase: JobPhase::Queued,
            progress: 0.0,
            message: "queued".to_string(),
            outcome: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_input_extensions() {
        assert!(is_supported_input(Path::new("/videos/clip.mp4")));
        assert!(is_supported_input(Path::new("/videos/clip.MKV")));
        assert!(is_supported_input(Path::new("clip.Mov")));
        assert!(is_supported_input(Path::new("clip.avi")));
        assert!(!is_supported_input(Path::new("clip.webm")));
        assert!(!is_supported_input(Path::new("clip.txt")));
        assert!(!is_supported_input(Path::new("no_extension")));
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_phase_terminality() {
        assert!(!JobPhase::Queued.is_terminal());
        assert!(!JobPhase::Running.is_terminal());
        assert!(JobPhase::Completed.is_terminal());
        assert!(JobPhase::Failed.is_terminal());
    }

    #[test]
    fn test_initial_state() {
        let id = JobId::new();
        let state = JobState::queued(id);
        assert_eq!(state.job_id, id);
        assert_eq!(state.phase, JobPhase::Queued);
        assert_eq!(state.progress, 0.0);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_spec_serialization_round_trip() {
        let spec = JobSpec::new("/in/a.mp4", "/out/a.mp4", "Remove Audio");
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: JobSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }
}
