//! Test doubles shared by unit and integration tests.

mod mock_runner;

pub use mock_runner::{MockRunner, ScriptedOutcome};
