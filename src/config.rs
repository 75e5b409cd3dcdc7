//! Engine configuration
//!
//! Read from the LSP `initializationOptions` object (JSON, camelCase keys).
//! Every field has a default, so `{}` and a missing object are both valid.
//!
//! ```json
//! {
//!   "completion": { "localSymbols": true, "errorPlaceholders": true },
//!   "logging": { "level": "debug", "noColor": false, "fileLogging": true, "logDir": "/tmp/phel" }
//! }
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Overrides `logging.level` when set
pub const LOG_LEVEL_ENV: &str = "PHEL_TOOLS_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub completion: CompletionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionConfig {
    /// Offer names bound in enclosing scopes in general mode
    pub local_symbols: bool,
    /// Report failed requests as an inert completion item instead of an empty list
    pub error_placeholders: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            local_symbols: true,
            error_placeholders: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// Filter directive for stderr (otherwise `RUST_LOG`, otherwise `info`)
    pub level: Option<String>,
    pub no_color: bool,
    /// Also write a DEBUG-level session log file
    pub file_logging: bool,
    /// Directory for session logs; defaults to the user cache directory
    pub log_dir: Option<PathBuf>,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse engine configuration")
    }

    /// Configuration from an `initializationOptions` value; `null` gives defaults
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).context("invalid engine configuration in initialization options")
    }

    /// Defaults with the environment overrides applied
    pub fn from_env_or_default() -> Self {
        Self::default().with_log_override(env::var(LOG_LEVEL_ENV).ok())
    }

    /// Replaces the log level when `level` is a non-empty directive
    pub fn with_log_override(mut self, level: Option<String>) -> Self {
        if let Some(level) = level.filter(|level| !level.trim().is_empty()) {
            self.logging.level = Some(level);
        }
        self
    }
}
