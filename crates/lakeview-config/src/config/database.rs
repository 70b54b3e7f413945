//! Metadata database configuration
//!
//! The host application keeps its own state in one database and loads the
//! bundled example datasets from a second one. The examples database falls
//! back to the primary settings field by field, so a single-database
//! deployment configures nothing extra.

use serde::{Deserialize, Serialize};

use super::{env_var_or, optional_env, parse_env_or, ConfigValidation};
use crate::error::{ConfigError, Result};

/// Full-URI override for the examples database
const EXAMPLES_URI_VAR: &str = "LAKEVIEW__SQLALCHEMY_EXAMPLES_URI";

/// Metadata database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection dialect (e.g. "postgresql")
    pub dialect: String,

    /// Database user
    pub user: String,

    /// Database password; empty means passwordless login
    pub password: String,

    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Examples database settings
    pub examples: ExamplesConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dialect: "postgresql".to_string(),
            user: "lakeview".to_string(),
            password: String::new(),
            host: "postgres".to_string(),
            port: 5432,
            database: "lakeview".to_string(),
            examples: ExamplesConfig::default(),
        }
    }
}

/// Examples database settings; each field falls back to the primary value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplesConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,

    /// Wholesale URI override; wins over the templated value
    pub uri_override: Option<String>,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        // Mirrors the DatabaseConfig defaults
        Self {
            user: "lakeview".to_string(),
            password: String::new(),
            host: "postgres".to_string(),
            port: 5432,
            database: "lakeview".to_string(),
            uri_override: None,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the database settings from the environment
    pub(crate) fn from_env() -> Result<Self> {
        let dialect = env_var_or("DATABASE_DIALECT", "postgresql");
        let user = env_var_or("DATABASE_USER", "lakeview");
        let password = env_var_or("DATABASE_PASSWORD", "");
        let host = env_var_or("DATABASE_HOST", "postgres");
        let port = parse_env_or("DATABASE_PORT", 5432u16)?;
        let database = env_var_or("DATABASE_DB", "lakeview");

        let examples = ExamplesConfig {
            user: env_var_or("EXAMPLES_USER", &user),
            password: env_var_or("EXAMPLES_PASSWORD", &password),
            host: env_var_or("EXAMPLES_HOST", &host),
            port: parse_env_or("EXAMPLES_PORT", port)?,
            database: env_var_or("EXAMPLES_DB", &database),
            uri_override: optional_env(EXAMPLES_URI_VAR),
        };

        Ok(Self {
            dialect,
            user,
            password,
            host,
            port,
            database,
            examples,
        })
    }

    /// Primary connection URI, templated from the resolved parts
    pub fn connection_uri(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.dialect, self.user, self.password, self.host, self.port, self.database
        )
    }

    /// Examples connection URI; the wholesale override wins when present
    pub fn examples_uri(&self) -> String {
        if let Some(uri) = &self.examples.uri_override {
            return uri.clone();
        }
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.dialect,
            self.examples.user,
            self.examples.password,
            self.examples.host,
            self.examples.port,
            self.examples.database
        )
    }
}

impl ConfigValidation for DatabaseConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("DATABASE_DIALECT", &self.dialect),
            ("DATABASE_USER", &self.user),
            ("DATABASE_HOST", &self.host),
            ("DATABASE_DB", &self.database),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_PORT".to_string(),
                value: self.port.to_string(),
                reason: "port cannot be zero".to_string(),
            });
        }

        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.password.is_empty() {
            warnings.push(
                "DATABASE_PASSWORD is empty; the database must accept passwordless logins"
                    .to_string(),
            );
        }
        warnings
    }
}
