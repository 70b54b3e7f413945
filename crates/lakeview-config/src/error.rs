//! Error types for the configuration resolver

use thiserror::Error;

/// Errors produced while resolving the deployment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment value is absent; empty values count as absent
    #[error("Missing required environment variable: {key}")]
    MissingRequired { key: String },

    /// An environment value could not be interpreted
    #[error("Invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A serialized override (role mapping, feature flags) failed to parse
    #[error("Failed to parse {key}: {details}")]
    ParseError { key: String, details: String },

    /// The assembled configuration is inconsistent
    #[error("Configuration validation failed: {details}")]
    ValidationFailed { details: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;
