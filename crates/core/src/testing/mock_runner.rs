//! Scriptable in-memory runner for tests.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use crate::job::{JobId, JobSpec};
use crate::preset::Preset;
use crate::runner::{JobRunner, ProgressUpdate, RunnerError};

/// What a scripted job should do when executed.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Finish successfully.
    Success,
    /// Fail as if the tool binary could not be spawned.
    LaunchFailure,
    /// Fail as if the tool's output stream broke mid-run.
    StreamFailure,
    /// Run to the end, then exit with the given non-zero code.
    ExitCode(i32),
}

/// A [`JobRunner`] that executes nothing and follows a per-job script.
///
/// Jobs succeed by default; use [`set_outcome`](Self::set_outcome) to make
/// specific ids fail. Records execution order and tracks how many jobs ran
/// at the same time.
#[derive(Clone, Default)]
pub struct MockRunner {
    executions: Arc<RwLock<Vec<JobId>>>,
    outcomes: Arc<RwLock<HashMap<JobId, ScriptedOutcome>>>,
    delay: Arc<RwLock<Duration>>,
    progress_ticks: Arc<RwLock<usize>>,
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the outcome for one job id.
    pub async fn set_outcome(&self, id: JobId, outcome: ScriptedOutcome) {
        self.outcomes.write().await.insert(id, outcome);
    }

    /// Sets how long each execution takes.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Sets how many progress updates each execution emits.
    pub async fn set_progress_ticks(&self, ticks: usize) {
        *self.progress_ticks.write().await = ticks;
    }

    /// Job ids in the order they started executing.
    pub async fn executions(&self) -> Vec<JobId> {
        self.executions.read().await.clone()
    }

    pub async fn execution_count(&self) -> usize {
        self.executions.read().await.len()
    }

    /// Highest number of simultaneously executing jobs observed so far.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn run_script(
        &self,
        spec: &JobSpec,
        progress: mpsc::Sender<ProgressUpdate>,
    ) -> Result<(), RunnerError> {
        let outcome = self
            .outcomes
            .read()
            .await
            .get(&spec.id)
            .cloned()
            .unwrap_or(ScriptedOutcome::Success);

        if let ScriptedOutcome::LaunchFailure = outcome {
            return Err(RunnerError::Launch {
                tool: "mock".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted launch failure"),
            });
        }

        let delay = *self.delay.read().await;
        let ticks = *self.progress_ticks.read().await;

        if ticks > 0 {
            let step = delay / ticks as u32;
            for i in 0..ticks {
                if !step.is_zero() {
                    tokio::time::sleep(step).await;
                }
                // Stays below 1.0 so the caller's final clamp is exercised
                let update = ProgressUpdate {
                    fraction: (i + 1) as f32 / (ticks + 1) as f32,
                    message: format!("frame {}", i + 1),
                };
                let _ = progress.send(update).await;
            }
        } else if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            ScriptedOutcome::Success => Ok(()),
            ScriptedOutcome::StreamFailure => Err(RunnerError::Stream(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted stream failure",
            ))),
            ScriptedOutcome::ExitCode(code) => Err(RunnerError::NonZeroExit(code)),
            ScriptedOutcome::LaunchFailure => unreachable!("handled before execution"),
        }
    }
}

#[async_trait::async_trait]
impl JobRunner for MockRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(
        &self,
        spec: &JobSpec,
        _preset: &Preset,
        progress: mpsc::Sender<ProgressUpdate>,
    ) -> Result<(), RunnerError> {
        self.executions.write().await.push(spec.id);

        let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        let result = self.run_script(spec, progress).await;

        self.current.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
