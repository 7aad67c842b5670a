//! Trait definitions for the runner module.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::job::JobSpec;
use crate::preset::Preset;

use super::error::RunnerError;

/// A progress update emitted while a job's process runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Progress fraction in `[0, 1]`, non-decreasing across the updates of
    /// one execution.
    pub fraction: f32,
    /// Human-readable status, e.g. `"frame 250"`.
    pub message: String,
}

/// Executes one job's external transcode to completion.
///
/// A runner owns the whole life of the external process for a single job:
/// launch, output streaming, and exit-code mapping. It knows nothing about
/// queues or concurrency limits; the dispatcher calls it from exactly one
/// task per job.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Runs the job to completion.
    ///
    /// Progress updates are sent through `progress` as the process emits
    /// output; if the receiver is dropped, execution continues without
    /// progress reporting. Returns `Ok(())` on exit code 0, otherwise a
    /// [`RunnerError`] describing the failure. There is no partial success.
    async fn execute(
        &self,
        spec: &JobSpec,
        preset: &Preset,
        progress: mpsc::Sender<ProgressUpdate>,
    ) -> Result<(), RunnerError>;
}
