//! Progress event contract between the dispatcher and its consumer.
//!
//! The dispatcher reports every job's lifecycle through a [`ProgressSink`]:
//! an ordered sequence of phase changes and progress updates terminating in
//! exactly one terminal event. Delivery is serialized per job, so a sink
//! implementation never sees two events of the same job out of order, but it
//! must be safe to call from any of the dispatcher's worker tasks.
//!
//! Consumers subscribe by handing the dispatcher a sink; [`ChannelSink`]
//! adapts the trait onto an unbounded channel for callers that prefer to
//! consume a stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::job::JobId;

/// What happened to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobEventKind {
    /// The job was admitted to the queue.
    Queued,
    /// The job acquired an execution slot and its process was started.
    Running,
    /// Progress advanced. The fraction is in `[0, 1]` and non-decreasing
    /// within a job; it is a heuristic estimate, not frame-accurate.
    Progress { fraction: f32, message: String },
    /// Terminal: the external process exited successfully.
    Completed,
    /// Terminal: the job failed. The reason is human-readable.
    Failed { reason: String },
}

impl JobEventKind {
    /// Whether this event ends the job's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

/// One job lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEvent {
    /// The job this event belongs to.
    pub job_id: JobId,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: JobEventKind,
}

impl JobEvent {
    /// Creates an event stamped with the current time.
    pub fn new(job_id: JobId, kind: JobEventKind) -> Self {
        Self {
            job_id,
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// Consumer of job lifecycle events.
///
/// Implementations must be cheap and non-blocking: delivery happens on the
/// dispatcher's worker tasks, and a slow sink delays progress reporting for
/// that job (never for other jobs).
pub trait ProgressSink: Send + Sync {
    /// Delivers one event. Failures are the sink's problem; the dispatcher
    /// never reacts to delivery errors.
    fn deliver(&self, event: JobEvent);
}

/// Sink that forwards events into an unbounded channel.
///
/// If the receiving half is dropped, events are silently discarded and jobs
/// keep running without progress reporting.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<JobEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver for its event stream.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn deliver(&self, event: JobEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("progress receiver dropped, discarding event");
        }
    }
}

/// Sink that drops every event. Useful for fire-and-forget callers and
/// tests that only assert on dispatcher state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn deliver(&self, _event: JobEvent) {}
}
