//! Web hardening configuration
//!
//! Fixed deployment posture: CSRF protection on, and the nginx reverse
//! proxy trusted for one hop of forwarded headers.

use serde::{Deserialize, Serialize};

/// CSRF and reverse-proxy trust settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// CSRF protection settings
    pub csrf: CsrfConfig,

    /// Honor forwarded headers from the reverse proxy
    pub enable_proxy_fix: bool,

    /// Trusted hop counts per forwarded header
    pub proxy_fix: ProxyFixConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            csrf: CsrfConfig::default(),
            enable_proxy_fix: true,
            proxy_fix: ProxyFixConfig::default(),
        }
    }
}

/// CSRF protection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    pub enabled: bool,

    /// View endpoints exempt from CSRF checks
    pub exempt: Vec<String>,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exempt: vec!["lakeview.views.api.validate_sql_json".to_string()],
        }
    }
}

/// Trusted hop counts for forwarded headers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyFixConfig {
    pub x_for: u32,
    pub x_proto: u32,
    pub x_host: u32,
    pub x_prefix: u32,
    pub x_port: u32,
}

impl Default for ProxyFixConfig {
    fn default() -> Self {
        Self {
            x_for: 1,
            x_proto: 1,
            x_host: 1,
            x_prefix: 1,
            x_port: 1,
        }
    }
}
