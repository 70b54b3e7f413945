//! Authentication configuration
//!
//! The host application logs users in either against its own credential
//! store or through a delegated OIDC identity provider. The mode is chosen
//! once from `AUTH_TYPE` and never changes for the process lifetime. OIDC
//! mode pulls its client credentials and discovery endpoint from the
//! environment with no fallback.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{env_var_or, optional_env, parse_env_or, parse_list, require_env, ConfigValidation};
use crate::error::{ConfigError, Result};

const AUTH_TYPE_VAR: &str = "AUTH_TYPE";
const ROLES_MAPPING_VAR: &str = "OIDC_ROLES_MAPPING";

/// Authentication mode for the host application login flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Credential-based login against the application's own user store
    Database,

    /// Delegated login through an external OIDC identity provider
    Oidc,
}

impl AuthMode {
    /// Parse from string with silent fallback to credential-based login.
    /// Matching is case-insensitive; unrecognized values are not an error.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "oauth" | "oidc" => Self::Oidc,
            _ => Self::Database, // default fallback (including "database" | "db")
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Oidc => write!(f, "oidc"),
        }
    }
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Selected authentication mode
    pub mode: AuthMode,

    /// OIDC provider settings; present exactly when `mode` is OIDC
    pub oidc: Option<OidcConfig>,

    /// Register unknown users on first login
    pub user_registration: bool,

    /// Role granted to self-registered users
    pub user_registration_role: String,

    /// Re-apply the role mapping on every login
    pub roles_sync_at_login: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::Database,
            oidc: None,
            user_registration: true,
            user_registration_role: "Viewer".to_string(),
            roles_sync_at_login: true,
        }
    }
}

/// Delegated-OIDC provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// OIDC client identifier
    pub client_id: String,

    /// OIDC client secret
    pub client_secret: String,

    /// Discovery document URL (the `.well-known` endpoint)
    pub discovery_url: String,

    /// Requested scopes
    pub scopes: Vec<String>,

    /// Optional fixed redirect URI; unset lets the host app derive its own
    pub redirect_uri: Option<String>,

    /// Claim carrying the login name
    pub username_claim: String,

    /// Claim carrying the identity provider group list
    pub groups_claim: String,

    /// Identity-provider group name -> internal application roles
    pub roles_mapping: BTreeMap<String, Vec<String>>,
}

impl OidcConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require_env("OIDC_CLIENT_ID")?,
            client_secret: require_env("OIDC_CLIENT_SECRET")?,
            discovery_url: require_env("OIDC_DISCOVERY_URL")?,
            scopes: parse_list(&env_var_or("OIDC_SCOPES", "openid,email,profile")),
            redirect_uri: optional_env("OIDC_REDIRECT_URI"),
            username_claim: env_var_or("OIDC_USERNAME_CLAIM", "preferred_username"),
            groups_claim: env_var_or("OIDC_GROUPS_CLAIM", "groups"),
            roles_mapping: load_roles_mapping()?,
        })
    }

    /// Provider API base URL: the discovery URL with its `/.well-known…`
    /// suffix removed and a trailing slash appended.
    pub fn api_base_url(&self) -> String {
        let base = match self.discovery_url.find("/.well-known") {
            Some(idx) => &self.discovery_url[..idx],
            None => &self.discovery_url,
        };
        format!("{}/", base.trim_end_matches('/'))
    }
}

impl AuthConfig {
    /// Resolve the authentication settings from the environment
    pub(crate) fn from_env() -> Result<Self> {
        let mode = AuthMode::from_str_or_default(&env_var_or(AUTH_TYPE_VAR, "database"));
        let oidc = match mode {
            AuthMode::Oidc => Some(OidcConfig::from_env()?),
            AuthMode::Database => None,
        };

        Ok(Self {
            mode,
            oidc,
            user_registration: parse_env_or("AUTH_USER_REGISTRATION", true)?,
            user_registration_role: env_var_or("AUTH_USER_REGISTRATION_ROLE", "Viewer"),
            roles_sync_at_login: parse_env_or("AUTH_ROLES_SYNC_AT_LOGIN", true)?,
        })
    }
}

impl ConfigValidation for AuthConfig {
    fn validate(&self) -> Result<()> {
        let Some(oidc) = &self.oidc else {
            return Ok(());
        };

        let parsed =
            Url::parse(&oidc.discovery_url).map_err(|e| ConfigError::InvalidValue {
                key: "OIDC_DISCOVERY_URL".to_string(),
                value: oidc.discovery_url.clone(),
                reason: e.to_string(),
            })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "OIDC_DISCOVERY_URL".to_string(),
                value: oidc.discovery_url.clone(),
                reason: "must be an http(s) URL".to_string(),
            });
        }

        if oidc.scopes.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "OIDC_SCOPES".to_string(),
                value: String::new(),
                reason: "at least one scope is required".to_string(),
            });
        }

        for (group, roles) in &oidc.roles_mapping {
            if roles.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    details: format!("role mapping for group '{group}' grants no roles"),
                });
            }
        }

        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.mode == AuthMode::Database && optional_env("OIDC_CLIENT_ID").is_some() {
            warnings.push(
                "OIDC_* variables are set but AUTH_TYPE selects credential-based login"
                    .to_string(),
            );
        }
        warnings
    }
}

/// Role mapping from the serialized override, or the documented default.
/// A present-but-malformed value is fatal: silently replacing a security
/// mapping with defaults could grant the wrong roles.
fn load_roles_mapping() -> Result<BTreeMap<String, Vec<String>>> {
    match optional_env(ROLES_MAPPING_VAR) {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
            key: ROLES_MAPPING_VAR.to_string(),
            details: e.to_string(),
        }),
        None => Ok(default_roles_mapping()),
    }
}

/// Documented default group-to-role mapping
pub(crate) fn default_roles_mapping() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        ("lakeview-admins".to_string(), vec!["Admin".to_string()]),
        ("lakeview-editors".to_string(), vec!["Editor".to_string()]),
        ("lakeview-viewers".to_string(), vec!["Viewer".to_string()]),
    ])
}
