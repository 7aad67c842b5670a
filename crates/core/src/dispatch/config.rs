//! Configuration for the dispatch module.

use serde::{Deserialize, Serialize};

/// Configuration for the job dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Maximum jobs in the Running state at once.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

fn default_max_concurrent_jobs() -> usize {
    5
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
        }
    }
}

impl DispatcherConfig {
    /// Sets the concurrency limit.
    pub fn with_max_concurrent_jobs(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatcherConfig::default();
        assert_eq!(config.max_concurrent_jobs, 5);
    }

    #[test]
    fn test_config_builder() {
        let config = DispatcherConfig::default().with_max_concurrent_jobs(2);
        assert_eq!(config.max_concurrent_jobs, 2);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config: DispatcherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_concurrent_jobs, 5);
    }
}
