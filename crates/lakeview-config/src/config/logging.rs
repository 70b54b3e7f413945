//! Logging configuration
//!
//! Logs are single-line structured records (timestamp, level, target,
//! message, optional error detail) so stdout can feed a log pipeline
//! directly. The subscriber is installed exactly once at startup, before
//! resolution, so resolution failures are themselves structured records.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::{env_var_or, ConfigValidation};
use crate::error::{ConfigError, Result};

const LOG_LEVEL_VAR: &str = "LAKEVIEW_LOG_LEVEL";
const LOG_FORMAT_VAR: &str = "LAKEVIEW_LOG_FORMAT";

const VALID_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
const VALID_FORMATS: [&str; 2] = ["json", "pretty"];

/// Structured logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            format: "json".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Resolve the logging settings from the environment. Public because the
    /// binary installs the subscriber before the full resolution pass runs.
    pub fn from_env() -> Self {
        Self {
            level: env_var_or(LOG_LEVEL_VAR, "INFO"),
            format: env_var_or(LOG_FORMAT_VAR, "json"),
        }
    }

    /// Install the process-wide tracing subscriber. Call once, from the
    /// binary, before configuration resolution. `RUST_LOG` wins over the
    /// resolved level when set.
    pub fn install(&self, debug: bool) {
        let level = if debug {
            "debug".to_string()
        } else {
            self.level.to_lowercase()
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        if self.format.eq_ignore_ascii_case("pretty") {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .json()
                .init();
        }
    }
}

impl ConfigValidation for LoggingConfig {
    fn validate(&self) -> Result<()> {
        if !VALID_LEVELS.contains(&self.level.to_uppercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                key: LOG_LEVEL_VAR.to_string(),
                value: self.level.clone(),
                reason: format!("must be one of: {}", VALID_LEVELS.join(", ")),
            });
        }

        if !VALID_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                key: LOG_FORMAT_VAR.to_string(),
                value: self.format.clone(),
                reason: format!("must be one of: {}", VALID_FORMATS.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "INFO");
        assert_eq!(logging.format, "json");
        assert!(logging.validate().is_ok());
    }

    #[test]
    fn test_level_validation_is_case_insensitive() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert!(logging.validate().is_ok());
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let logging = LoggingConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(logging.validate().is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let logging = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(logging.validate().is_err());
    }
}
