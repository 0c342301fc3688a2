//! Configuration module for cmdline-probe
//!
//! Provides configuration loading, validation, and default settings
//! for the enumeration engine, the binary's output and logging.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults, OutputFormat, ReaderKind};
pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use validator::{validate_config, ConfigValidator, MAX_CHANNEL_CAPACITY};

// Re-export the main configuration structures
pub use loader::{Config, EngineConfig, LoggingConfig, OutputConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
