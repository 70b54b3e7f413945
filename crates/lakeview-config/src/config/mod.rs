//! Configuration module for the Lakeview deployment resolver
//!
//! One file per settings section, composed into [`Config`]. Resolution is a
//! single pass over the process environment at startup; the resulting value
//! is immutable and may be shared freely afterwards.

mod auth;
mod cache;
mod database;
mod features;
pub mod logging;
mod queue;
mod web;

pub use auth::{AuthConfig, AuthMode, OidcConfig};
pub use cache::{CacheConfig, RedisConfig};
pub use database::{DatabaseConfig, ExamplesConfig};
pub use features::FeatureFlags;
pub use logging::LoggingConfig;
pub use queue::{ScheduleEntry, TaskQueueConfig};
pub use web::{CsrfConfig, ProxyFixConfig, WebConfig};

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

/// Environment variable holding the host application signing key
pub const SECRET_KEY_VAR: &str = "LAKEVIEW_SECRET_KEY";

/// Common configuration validation trait
pub trait ConfigValidation {
    /// Validate the section
    fn validate(&self) -> Result<()>;

    /// Non-fatal issues worth surfacing at startup
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Resolved deployment configuration for the host application
///
/// Constructed once by [`Config::from_env`] and read-only afterwards. No
/// subsystem mutates it, so it can be handed by reference to any number of
/// consumers without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Session/signing key handed to the host application
    pub secret_key: String,

    /// Metadata database settings
    pub database: DatabaseConfig,

    /// Redis connection settings shared by the cache layer and task queue
    pub redis: RedisConfig,

    /// Cache parameters shared by the parallel host-application caches
    pub cache: CacheConfig,

    /// Task broker and beat-schedule settings
    pub queue: TaskQueueConfig,

    /// Authentication mode and, in OIDC mode, provider settings
    pub auth: AuthConfig,

    /// Structured logging settings
    pub logging: LoggingConfig,

    /// CSRF and reverse-proxy trust settings
    pub web: WebConfig,

    /// Feature flags forwarded to the host application
    pub features: FeatureFlags,
}

impl Config {
    /// Resolve the deployment configuration from the process environment.
    ///
    /// Single pass: required secrets fail fast with no fallback, optional
    /// variables substitute their documented defaults, and composite values
    /// (connection URIs, broker URLs) are templated from already-resolved
    /// parts. The pass never opens a network or database connection.
    pub fn from_env() -> Result<Self> {
        let secret_key = require_env(SECRET_KEY_VAR)?;
        let database = DatabaseConfig::from_env()?;
        let redis = RedisConfig::from_env()?;
        let cache = CacheConfig::from_env()?;
        let queue = TaskQueueConfig::default();
        let auth = AuthConfig::from_env()?;
        let logging = LoggingConfig::from_env();
        let web = WebConfig::default();
        let features = FeatureFlags::from_env()?;

        let config = Self {
            secret_key,
            database,
            redis,
            cache,
            queue,
            auth,
            logging,
            web,
            features,
        };
        config.validate()?;
        info!("Configuration resolved successfully");
        Ok(config)
    }

    /// Redacted one-line summary for startup logging. Never includes the
    /// signing key, passwords or the OIDC client secret.
    pub fn summary(&self) -> String {
        format!(
            "database={}@{}:{}/{} redis={}:{} auth={} log={}/{} features={}",
            self.database.dialect,
            self.database.host,
            self.database.port,
            self.database.database,
            self.redis.host,
            self.redis.port,
            self.auth.mode,
            self.logging.level,
            self.logging.format,
            self.features.enabled_count(),
        )
    }
}

impl ConfigValidation for Config {
    fn validate(&self) -> Result<()> {
        self.database.validate()?;
        self.redis.validate()?;
        self.cache.validate()?;
        self.queue.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = self.database.warnings();
        warnings.extend(self.auth.warnings());
        warnings
    }
}

/// Read a required environment variable; empty values count as missing
pub(crate) fn require_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingRequired {
            key: key.to_string(),
        }),
    }
}

/// Read an environment variable or substitute the documented default
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable if set and non-empty
pub(crate) fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an environment variable, or substitute the default.
/// Unparseable values are fatal, not silently defaulted.
pub(crate) fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated list, dropping empty items
pub(crate) fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
