use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Concurrency limit is at least 1
/// - Progress increment is within (0, 1]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.dispatcher.max_concurrent_jobs == 0 {
        return Err(ConfigError::ValidationError(
            "dispatcher.max_concurrent_jobs cannot be 0".to_string(),
        ));
    }

    let increment = config.runner.progress_increment;
    if !(increment > 0.0 && increment <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "runner.progress_increment must be in (0, 1], got {increment}"
        )));
    }

    Ok(())
}
