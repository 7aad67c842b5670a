//! Job data model.
//!
//! A job is one request to transcode a single input file to a single output
//! file under one preset. `JobSpec` is the immutable description handed to
//! the dispatcher; `JobState` is the mutable lifecycle record the dispatcher
//! owns while the job is queued or running.

mod types;

pub use types::{
    is_supported_input, JobId, JobOutcome, JobPhase, JobSpec, JobState, SUPPORTED_INPUT_EXTENSIONS,
};
