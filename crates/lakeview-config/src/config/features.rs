//! Feature flags forwarded to the host application

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::optional_env;
use crate::error::{ConfigError, Result};

const FEATURE_FLAGS_VAR: &str = "LAKEVIEW_FEATURE_FLAGS";

/// Feature-flag set handed to the host application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Named flags; the override merges over the built-ins
    pub flags: BTreeMap<String, bool>,

    /// Lift the row limit on CTAS queries in the SQL editor
    pub sqllab_ctas_no_limit: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            flags: BTreeMap::from([("ALERT_REPORTS".to_string(), true)]),
            sqllab_ctas_no_limit: true,
        }
    }
}

impl FeatureFlags {
    /// Resolve the flags, merging the serialized override over the built-ins
    pub(crate) fn from_env() -> Result<Self> {
        let mut features = Self::default();
        if let Some(raw) = optional_env(FEATURE_FLAGS_VAR) {
            features.apply_override(&raw)?;
        }
        Ok(features)
    }

    /// Merge a serialized `{"FLAG": bool}` object over the current flags.
    /// Malformed input is fatal, same policy as the role-mapping override.
    pub fn apply_override(&mut self, raw: &str) -> Result<()> {
        let overrides: BTreeMap<String, bool> =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseError {
                key: FEATURE_FLAGS_VAR.to_string(),
                details: e.to_string(),
            })?;
        self.flags.extend(overrides);
        Ok(())
    }

    /// Number of enabled flags
    pub fn enabled_count(&self) -> usize {
        self.flags.values().filter(|enabled| **enabled).count()
    }
}
