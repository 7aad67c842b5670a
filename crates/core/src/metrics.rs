//! Prometheus metrics for the dispatch engine.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts};

/// Jobs admitted to the queue.
pub static JOBS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("clipforge_jobs_submitted_total", "Total jobs submitted").unwrap()
});

/// Jobs rejected at submission, by reason.
pub static JOBS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "clipforge_jobs_rejected_total",
            "Total jobs rejected at submission",
        ),
        &["reason"], // "unknown_preset", "duplicate_id", "output_collision", "shut_down"
    )
    .unwrap()
});

/// Jobs that reached the Completed state.
pub static JOBS_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "clipforge_jobs_completed_total",
        "Total jobs completed successfully",
    )
    .unwrap()
});

/// Jobs that reached the Failed state.
pub static JOBS_FAILED: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("clipforge_jobs_failed_total", "Total jobs failed").unwrap());

/// Jobs currently holding an execution slot.
pub static JOBS_RUNNING: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("clipforge_jobs_running", "Jobs currently running").unwrap());

/// Wall-clock duration of finished jobs in seconds.
pub static JOB_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "clipforge_job_duration_seconds",
            "Duration of finished transcode jobs",
        )
        .buckets(vec![
            1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0,
        ]),
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOBS_REJECTED.clone()),
        Box::new(JOBS_COMPLETED.clone()),
        Box::new(JOBS_FAILED.clone()),
        Box::new(JOBS_RUNNING.clone()),
        Box::new(JOB_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
    }
}
