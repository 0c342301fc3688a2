//! Configuration validator for cmdline-probe
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, EngineConfig, LoggingConfig};

/// Largest accepted record channel capacity
pub const MAX_CHANNEL_CAPACITY: usize = 4096;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_engine(&config.engine)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates engine configuration
    fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
        if engine.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "Channel capacity must be at least 1".to_string(),
            ));
        }

        if engine.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "Channel capacity cannot exceed {}",
                MAX_CHANNEL_CAPACITY
            )));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        if !logging.file.is_empty() && logging.file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Log file path cannot be blank".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
