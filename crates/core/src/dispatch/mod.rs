//! Bounded-concurrency job dispatch engine.
//!
//! The dispatcher owns admission and execution:
//! - `submit` validates a job and appends it to an unbounded FIFO queue,
//!   returning immediately.
//! - A counting limiter caps how many jobs run at once (default 5). The
//!   queue is drained whenever a job is submitted or a slot frees up.
//! - Each running job gets its own task; a job's failure never affects
//!   other jobs or the dispatcher itself.
//!
//! # Example
//!
//! ```ignore
//! use clipforge_core::dispatch::{Dispatcher, DispatcherConfig};
//! use clipforge_core::events::ChannelSink;
//! use clipforge_core::runner::FfmpegRunner;
//!
//! let (sink, mut events) = ChannelSink::channel();
//! let dispatcher = Dispatcher::new(
//!     DispatcherConfig::default(),
//!     FfmpegRunner::with_defaults(),
//!     Arc::new(sink),
//! );
//!
//! dispatcher.submit(spec).await?;
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! ```

mod config;
mod dispatcher;
mod types;

pub use config::DispatcherConfig;
pub use dispatcher::{Dispatcher, SubmitError};
pub use types::DispatcherStatus;
