//! Redis and cache configuration

use serde::{Deserialize, Serialize};

use super::{env_var_or, parse_env_or, ConfigValidation};
use crate::error::{ConfigError, Result};

/// Redis connection settings shared by the cache layer and the task queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis host
    pub host: String,

    /// Redis port
    pub port: u16,

    /// Database index backing the task broker
    pub broker_db: u32,

    /// Database index backing caches and task results
    pub results_db: u32,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "redis".to_string(),
            port: 6379,
            broker_db: 0,
            results_db: 1,
        }
    }
}

impl RedisConfig {
    /// Resolve the Redis settings from the environment
    pub(crate) fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_var_or("REDIS_HOST", "redis"),
            port: parse_env_or("REDIS_PORT", 6379u16)?,
            broker_db: parse_env_or("REDIS_BROKER_DB", 0u32)?,
            results_db: parse_env_or("REDIS_RESULTS_DB", 1u32)?,
        })
    }

    /// Task-broker connection URL
    pub fn broker_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.broker_db)
    }

    /// Result-backend connection URL
    pub fn results_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.results_db)
    }
}

impl ConfigValidation for RedisConfig {
    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "REDIS_HOST".to_string(),
                value: self.host.clone(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REDIS_PORT".to_string(),
                value: self.port.to_string(),
                reason: "port cannot be zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Cache parameters shared by the parallel host-application caches
/// (response, data, filter-state and explore-form-data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default entry TTL in seconds
    pub default_timeout_secs: u64,

    /// Cache key prefix
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 300,
            key_prefix: "lakeview_".to_string(),
        }
    }
}

impl CacheConfig {
    /// Resolve the cache parameters from the environment
    pub(crate) fn from_env() -> Result<Self> {
        Ok(Self {
            default_timeout_secs: parse_env_or("CACHE_DEFAULT_TIMEOUT", 300u64)?,
            key_prefix: env_var_or("CACHE_KEY_PREFIX", "lakeview_"),
        })
    }
}

impl ConfigValidation for CacheConfig {
    fn validate(&self) -> Result<()> {
        if self.key_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CACHE_KEY_PREFIX".to_string(),
                value: self.key_prefix.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
