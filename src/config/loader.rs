//! Configuration loader for cmdline-probe
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::{default_config, OutputFormat, ReaderKind};
use crate::engine::{PrivilegePolicy, SortKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cmdline-probe.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_engine")]
    pub engine: EngineConfig,

    #[serde(default = "default_output")]
    pub output: OutputConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Enumeration engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_reader")]
    pub reader: ReaderKind,
    #[serde(default = "default_require_debug_privilege")]
    pub require_debug_privilege: bool,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl EngineConfig {
    /// Privilege policy implied by `require_debug_privilege`
    pub fn privilege_policy(&self) -> PrivilegePolicy {
        if self.require_debug_privilege {
            PrivilegePolicy::Required
        } else {
            PrivilegePolicy::BestEffort
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    /// Collect and sort before printing; unset streams in snapshot order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortKey>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; empty logs to stderr
    #[serde(default = "default_log_file")]
    pub file: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, returning defaults only when the file is missing
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }
}

// Default functions for serde
fn default_engine() -> EngineConfig {
    let defaults = default_config();
    EngineConfig {
        reader: defaults.engine.reader,
        require_debug_privilege: defaults.engine.require_debug_privilege,
        channel_capacity: defaults.engine.channel_capacity,
    }
}

fn default_output() -> OutputConfig {
    OutputConfig {
        format: default_config().output.format,
        sort_by: None,
    }
}

fn default_logging() -> LoggingConfig {
    let defaults = default_config();
    LoggingConfig {
        level: defaults.logging.level,
        file: defaults.logging.file,
    }
}

// Individual field defaults
fn default_reader() -> ReaderKind {
    default_config().engine.reader
}

fn default_require_debug_privilege() -> bool {
    default_config().engine.require_debug_privilege
}

fn default_channel_capacity() -> usize {
    default_config().engine.channel_capacity
}

fn default_format() -> OutputFormat {
    default_config().output.format
}

fn default_log_level() -> String {
    default_config().logging.level
}

fn default_log_file() -> String {
    default_config().logging.file
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: default_engine(),
            output: default_output(),
            logging: default_logging(),
        }
    }
}
