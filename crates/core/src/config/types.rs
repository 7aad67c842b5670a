use serde::{Deserialize, Serialize};

use crate::dispatch::DispatcherConfig;
use crate::runner::RunnerConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Job admission and concurrency settings.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// External encoder settings.
    #[serde(default)]
    pub runner: RunnerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.dispatcher.max_concurrent_jobs, 5);
        assert_eq!(config.runner.tool_path.to_str(), Some("ffmpeg"));
        assert_eq!(config.runner.progress_increment, 0.01);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[dispatcher]
max_concurrent_jobs = 2
"#,
        )
        .unwrap();
        assert_eq!(config.dispatcher.max_concurrent_jobs, 2);
        assert_eq!(config.runner.tool_path.to_str(), Some("ffmpeg"));
    }
}
