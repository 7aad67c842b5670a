//! Dispatcher implementation.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex, OwnedSemaphorePermit, RwLock, Semaphore};
use tracing::{debug, info, warn};

use crate::events::{JobEvent, JobEventKind, ProgressSink};
use crate::job::{JobId, JobOutcome, JobPhase, JobSpec, JobState};
use crate::metrics;
use crate::preset::{Preset, PresetCatalog};
use crate::runner::{JobRunner, ProgressUpdate};

use super::config::DispatcherConfig;
use super::types::{DispatcherStats, DispatcherStatus};

/// Buffer for per-job progress updates between runner and dispatcher.
const PROGRESS_BUFFER: usize = 64;

/// Errors returned by [`Dispatcher::submit`].
///
/// All of these are caller-input validation; they fail fast before any
/// queue or limiter state is touched.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The preset tag is not in the catalog.
    #[error("unknown preset: {0:?}")]
    UnknownPreset(String),

    /// The job id was already submitted.
    #[error("duplicate job id: {0}")]
    DuplicateJobId(JobId),

    /// The output path equals the input path, which would overwrite the
    /// source file.
    #[error("output path would overwrite input: {0}")]
    OutputOverwritesInput(PathBuf),

    /// The dispatcher has been shut down and no longer admits jobs.
    #[error("dispatcher is shut down")]
    ShutDown,
}

/// A job admitted to the queue, with its preset already resolved.
struct QueuedJob {
    spec: JobSpec,
    preset: Preset,
}

struct Inner<R> {
    config: DispatcherConfig,
    catalog: PresetCatalog,
    runner: R,
    sink: Arc<dyn ProgressSink>,
    limiter: Arc<Semaphore>,
    queue: Mutex<VecDeque<QueuedJob>>,
    states: RwLock<HashMap<JobId, JobState>>,
    stats: DispatcherStats,
    admitting: AtomicBool,
}

/// Bounded-concurrency job dispatcher.
///
/// Cheap to clone; clones share the same queue, limiter, and state.
pub struct Dispatcher<R: JobRunner + 'static> {
    inner: Arc<Inner<R>>,
}

impl<R: JobRunner + 'static> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: JobRunner + 'static> Dispatcher<R> {
    /// Creates a dispatcher with the given runner and event sink.
    pub fn new(config: DispatcherConfig, runner: R, sink: Arc<dyn ProgressSink>) -> Self {
        let limiter = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        Self {
            inner: Arc::new(Inner {
                config,
                catalog: PresetCatalog::new(),
                runner,
                sink,
                limiter,
                queue: Mutex::new(VecDeque::new()),
                states: RwLock::new(HashMap::new()),
                stats: DispatcherStats::default(),
                admitting: AtomicBool::new(true),
            }),
        }
    }

    /// Admits a job to the FIFO queue.
    ///
    /// Returns as soon as the job is queued; execution happens in the
    /// background as slots free up. Validation failures are reported here
    /// and leave the dispatcher untouched.
    pub async fn submit(&self, spec: JobSpec) -> Result<(), SubmitError> {
        let inner = &self.inner;

        if !inner.admitting.load(Ordering::SeqCst) {
            metrics::JOBS_REJECTED.with_label_values(&["shut_down"]).inc();
            return Err(SubmitError::ShutDown);
        }

        let preset = match inner.catalog.resolve(&spec.preset_tag) {
            Some(preset) => preset,
            None => {
                metrics::JOBS_REJECTED
                    .with_label_values(&["unknown_preset"])
                    .inc();
                return Err(SubmitError::UnknownPreset(spec.preset_tag.clone()));
            }
        };

        if spec.output_path == spec.input_path {
            metrics::JOBS_REJECTED
                .with_label_values(&["output_collision"])
                .inc();
            return Err(SubmitError::OutputOverwritesInput(spec.output_path.clone()));
        }

        // Duplicate check and registration under one write lock, so two
        // concurrent submits of the same id cannot both pass.
        {
            let mut states = inner.states.write().await;
            if states.contains_key(&spec.id) {
                metrics::JOBS_REJECTED
                    .with_label_values(&["duplicate_id"])
                    .inc();
                return Err(SubmitError::DuplicateJobId(spec.id));
            }
            states.insert(spec.id, JobState::queued(spec.id));
        }

        inner.stats.queued.fetch_add(1, Ordering::Relaxed);
        metrics::JOBS_SUBMITTED.inc();

        // Queued is delivered before the job can possibly start, keeping
        // the per-job event stream ordered.
        inner.sink.deliver(JobEvent::new(spec.id, JobEventKind::Queued));
        debug!(job_id = %spec.id, preset = %preset, "job queued");

        inner.queue.lock().await.push_back(QueuedJob { spec, preset });
        Arc::clone(inner).pump().await;
        Ok(())
    }

    /// Stops admitting new jobs. Queued and running jobs are unaffected.
    pub fn shutdown(&self) {
        if self.inner.admitting.swap(false, Ordering::SeqCst) {
            info!("dispatcher shut down, no longer admitting jobs");
        }
    }

    /// Returns the current counters.
    pub fn status(&self) -> DispatcherStatus {
        self.inner.stats.to_status(
            self.inner.config.max_concurrent_jobs,
            self.inner.admitting.load(Ordering::SeqCst),
        )
    }

    /// Number of jobs currently in the Running state. Callers can poll
    /// this (or watch the event stream) to derive a busy/idle signal.
    pub fn active_jobs(&self) -> usize {
        self.status().running
    }

    /// Snapshot of one job's state, if the id is known.
    pub async fn job_state(&self, id: JobId) -> Option<JobState> {
        self.inner.states.read().await.get(&id).cloned()
    }

    /// Snapshot of every known job's state, in no particular order.
    pub async fn jobs(&self) -> Vec<JobState> {
        self.inner.states.read().await.values().cloned().collect()
    }
}

impl<R: JobRunner + 'static> Inner<R> {
    /// Drains the queue head into free slots.
    ///
    /// Called after every submit and after every slot release. Safe under
    /// concurrent callers: a slot is claimed before a job is popped, so a
    /// job can never be started twice, and the re-check after a release
    /// means a concurrent submit cannot be orphaned.
    async fn pump(self: Arc<Self>) {
        loop {
            let permit = match Arc::clone(&self.limiter).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let next = self.queue.lock().await.pop_front();
            match next {
                Some(job) => {
                    let inner = Arc::clone(&self);
                    tokio::spawn(inner.run_job(job, permit));
                }
                None => {
                    drop(permit);
                    // A submit may have enqueued between the empty pop and
                    // this release; re-check so that job is not stranded.
                    if self.queue.lock().await.is_empty() {
                        break;
                    }
                }
            }
        }
    }

    /// Runs one job to its terminal state. The permit is held for the whole
    /// execution and released on every exit path when it drops.
    ///
    /// Returns an explicitly boxed future: `run_job` and `pump` are mutually
    /// recursive (a finished job pumps the queue, the pump spawns jobs), and
    /// without the type erasure the compiler cannot resolve the `Send` bound
    /// of either future.
    fn run_job(
        self: Arc<Self>,
        job: QueuedJob,
        permit: OwnedSemaphorePermit,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(self.run_job_inner(job, permit))
    }

    async fn run_job_inner(self: Arc<Self>, job: QueuedJob, permit: OwnedSemaphorePermit) {
        let job_id = job.spec.id;
        let started = Instant::now();

        self.stats.queued.fetch_sub(1, Ordering::Relaxed);
        self.stats.running.fetch_add(1, Ordering::Relaxed);
        metrics::JOBS_RUNNING.inc();

        self.update_state(job_id, |state| {
            state.phase = JobPhase::Running;
            state.message = "processing".to_string();
        })
        .await;
        self.sink.deliver(JobEvent::new(job_id, JobEventKind::Running));
        info!(
            job_id = %job_id,
            input = %job.spec.input_path.display(),
            preset = %job.preset,
            "job started"
        );

        let (tx, mut rx) = mpsc::channel::<ProgressUpdate>(PROGRESS_BUFFER);
        let exec = self.runner.execute(&job.spec, &job.preset, tx);

        // Forward progress while the process runs. The runner already
        // clamps and orders its updates; the guard here only drops exact
        // repeats so consumers see a strictly advancing fraction.
        let forward = async {
            let mut last: f32 = 0.0;
            while let Some(update) = rx.recv().await {
                if update.fraction <= last {
                    continue;
                }
                last = update.fraction;
                self.update_state(job_id, |state| {
                    state.progress = update.fraction;
                    state.message = update.message.clone();
                })
                .await;
                self.sink.deliver(JobEvent::new(
                    job_id,
                    JobEventKind::Progress {
                        fraction: update.fraction,
                        message: update.message,
                    },
                ));
            }
            last
        };

        let (result, last_fraction) = tokio::join!(exec, forward);

        match result {
            Ok(()) => {
                if last_fraction < 1.0 {
                    self.update_state(job_id, |state| state.progress = 1.0).await;
                    self.sink.deliver(JobEvent::new(
                        job_id,
                        JobEventKind::Progress {
                            fraction: 1.0,
                            message: "done".to_string(),
                        },
                    ));
                }
                self.update_state(job_id, |state| {
                    state.phase = JobPhase::Completed;
                    state.message = "completed".to_string();
                    state.outcome = Some(JobOutcome::Success);
                })
                .await;
                self.stats.completed.fetch_add(1, Ordering::Relaxed);
                metrics::JOBS_COMPLETED.inc();
                self.sink.deliver(JobEvent::new(job_id, JobEventKind::Completed));
                info!(job_id = %job_id, elapsed_ms = started.elapsed().as_millis() as u64, "job completed");
            }
            Err(e) => {
                let reason = e.to_string();
                self.update_state(job_id, |state| {
                    state.phase = JobPhase::Failed;
                    state.message = reason.clone();
                    state.outcome = Some(JobOutcome::Failure {
                        reason: reason.clone(),
                    });
                })
                .await;
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                metrics::JOBS_FAILED.inc();
                self.sink.deliver(JobEvent::new(
                    job_id,
                    JobEventKind::Failed {
                        reason: reason.clone(),
                    },
                ));
                warn!(job_id = %job_id, reason = %reason, "job failed");
            }
        }

        self.stats.running.fetch_sub(1, Ordering::Relaxed);
        metrics::JOBS_RUNNING.dec();
        metrics::JOB_DURATION.observe(started.elapsed().as_secs_f64());

        // Free the slot, then look for the next queued job.
        drop(permit);
        self.pump().await;
    }

    async fn update_state(&self, job_id: JobId, f: impl FnOnce(&mut JobState)) {
        let mut states = self.states.write().await;
        if let Some(state) = states.get_mut(&job_id) {
            f(state);
        }
    }
}
