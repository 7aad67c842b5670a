//! Process runner for executing one transcode job.
//!
//! This module provides the `JobRunner` trait and the ffmpeg-backed
//! implementation. A runner executes exactly one job's external process to
//! completion, translating the process's textual output into structured
//! progress updates.
//!
//! # Example
//!
//! ```ignore
//! use clipforge_core::runner::{FfmpegRunner, JobRunner, RunnerConfig};
//!
//! let runner = FfmpegRunner::new(RunnerConfig::default());
//! let (tx, mut rx) = tokio::sync::mpsc::channel(64);
//!
//! tokio::spawn(async move {
//!     while let Some(update) = rx.recv().await {
//!         println!("{:.0}% {}", update.fraction * 100.0, update.message);
//!     }
//! });
//!
//! runner.execute(&spec, &preset, tx).await?;
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use ffmpeg::FfmpegRunner;
pub use traits::{JobRunner, ProgressUpdate};
