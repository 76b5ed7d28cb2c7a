//! Logging
//!
//! Structured logging via `tracing`. The engine emits at debug/trace on the
//! hot paths and info on bulk operations; hosts embedding the library can
//! install their own subscriber instead of calling `init_logging`.

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive: trace, debug, info, warn, error, off.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: text (default) or json.
    #[serde(default = "default_format")]
    pub format: String,

    /// Colored output (text format only).
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize the global subscriber.
///
/// The `MATPATH_LOG` environment variable overrides the configured level
/// and accepts full `EnvFilter` directives. Calling this twice fails, as
/// does calling it when the host already installed a subscriber.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), TreeError> {
    let level = std::env::var("MATPATH_LOG")
        .ok()
        .or_else(|| config.map(|c| c.level.clone()))
        .unwrap_or_else(default_log_level);

    let filter = EnvFilter::try_new(&level)
        .map_err(|e| TreeError::Config(format!("invalid log filter {:?}: {}", level, e)))?;

    let base = Registry::default().with(filter);
    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    let color = config.map(|c| c.color).unwrap_or(true);

    let result = if format == "json" {
        base.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        base.with(fmt::layer().with_target(true).with_ansi(color))
            .try_init()
    };

    result.map_err(|e| TreeError::Config(format!("failed to initialize logging: {}", e)))
}
