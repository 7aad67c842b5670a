//! Types for the dispatch module.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for the dispatcher.
#[derive(Debug, Default)]
pub(super) struct DispatcherStats {
    pub(super) queued: AtomicU64,
    pub(super) running: AtomicU64,
    pub(super) completed: AtomicU64,
    pub(super) failed: AtomicU64,
}

impl DispatcherStats {
    pub(super) fn to_status(&self, max_concurrent: usize, admitting: bool) -> DispatcherStatus {
        DispatcherStatus {
            max_concurrent,
            admitting,
            queued: self.queued.load(Ordering::Relaxed) as usize,
            running: self.running.load(Ordering::Relaxed) as usize,
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of the dispatcher's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherStatus {
    /// Configured concurrency limit.
    pub max_concurrent: usize,
    /// Whether new jobs are still admitted.
    pub admitting: bool,
    /// Jobs waiting for an execution slot.
    pub queued: usize,
    /// Jobs currently running.
    pub running: usize,
    /// Jobs that completed successfully since startup.
    pub completed: u64,
    /// Jobs that failed since startup.
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_snapshot() {
        let stats = DispatcherStats::default();
        stats.queued.store(3, Ordering::Relaxed);
        stats.running.store(2, Ordering::Relaxed);
        stats.completed.store(10, Ordering::Relaxed);

        let status = stats.to_status(5, true);
        assert_eq!(status.queued, 3);
        assert_eq!(status.running, 2);
        assert_eq!(status.completed, 10);
        assert_eq!(status.failed, 0);
        assert_eq!(status.max_concurrent, 5);
        assert!(status.admitting);
    }
}
