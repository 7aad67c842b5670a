//! Error types for the runner module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a single job.
///
/// Every variant is fatal to its own job only: the dispatcher converts it
/// into a terminal `Failed` event and carries on draining the queue.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The external tool was not found or failed to start.
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the process output stream failed mid-flight.
    #[error("failed to read process output: {0}")]
    Stream(#[source] std::io::Error),

    /// The tool ran but reported failure via its exit code.
    #[error("process exited with code {0}")]
    NonZeroExit(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_human_readable() {
        let err = RunnerError::NonZeroExit(1);
        assert_eq!(err.to_string(), "process exited with code 1");

        let err = RunnerError::Launch {
            tool: PathBuf::from("ffmpeg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("ffmpeg"));
    }
}
