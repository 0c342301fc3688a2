//! Default configuration values for cmdline-probe

use serde::{Deserialize, Serialize};

/// Which process-internals reader the Windows platform uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderKind {
    /// Reads the command line out of the target's parameter block
    Peb,
    /// Documented APIs only; reports names without command lines
    Documented,
}

/// How the binary prints records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub engine: EngineDefaults,
    pub output: OutputDefaults,
    pub logging: LoggingDefaults,
}

/// Default engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDefaults {
    pub reader: ReaderKind,
    pub require_debug_privilege: bool,
    pub channel_capacity: usize,
}

/// Default output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDefaults {
    pub format: OutputFormat,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub file: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        engine: EngineDefaults {
            reader: ReaderKind::Peb,
            require_debug_privilege: true,
            channel_capacity: 64,
        },
        output: OutputDefaults {
            format: OutputFormat::Json,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
            file: String::new(),
        },
    }
}
