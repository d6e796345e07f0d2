//! Configuration for the worker bridge.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file (JSON)
//! 3. Default values

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Worker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interpreter payload settings.
    pub payload: PayloadSection,
    /// Lazy file manifest: virtual path → remote URL.
    pub files: HashMap<String, String>,
    /// Statements run once after startup, before readiness is announced.
    pub bootstrap: BootstrapSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Interpreter payload settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadSection {
    /// URL of the interpreter payload.
    pub url: String,
    /// Fixed argument set handed to the payload's entry point.
    pub entry_args: Vec<String>,
}

/// Bootstrap statement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSection {
    /// Ordered statements to run; the defaults pre-import the
    /// console-creation facility.
    pub statements: Vec<String>,
}

impl Default for BootstrapSection {
    fn default() -> Self {
        Self {
            statements: vec![
                "import code".to_string(),
                "c = code.InteractiveConsole()".to_string(),
            ],
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("REPL_BRIDGE_PAYLOAD_URL") {
            if !url.is_empty() {
                self.payload.url = url;
            }
        }

        if let Ok(level) = std::env::var("REPL_BRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Load configuration with the full priority chain.
    ///
    /// Priority: env vars > config file > defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Validate that the configuration can drive a load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payload.url.is_empty() {
            return Err(ConfigError::MissingPayloadUrl);
        }
        Ok(())
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// No payload URL configured.
    #[error("no payload URL configured")]
    MissingPayloadUrl,
}
