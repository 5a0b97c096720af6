use crate::config::types::{Config, EngineConfig, FetcherConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_engine_config(&config.engine)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    // A zero timeout would make every fetch fail immediately
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs ({}) cannot exceed timeout-secs ({})",
            config.connect_timeout_secs, config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates engine configuration
fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.map_jobs < 1 || config.map_jobs > 256 {
        return Err(ConfigError::Validation(format!(
            "map-jobs must be between 1 and 256, got {}",
            config.map_jobs
        )));
    }

    if config.max_iterations < 1 {
        return Err(ConfigError::Validation(format!(
            "max-iterations must be >= 1, got {}",
            config.max_iterations
        )));
    }

    Ok(())
}
