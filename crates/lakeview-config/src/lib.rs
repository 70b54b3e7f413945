//! # Lakeview Deployment Configuration Resolver
//!
//! Resolves the deployment configuration of the Lakeview analytics platform
//! from the process environment, once, at startup.
//!
//! ## Features
//!
//! - **Fail-fast secrets**: required values (signing key, OIDC credentials)
//!   have no fallback; resolution stops before anything else starts
//! - **Documented defaults**: every optional variable substitutes a known
//!   default when unset
//! - **Composite values**: database URIs, cache parameters and task-broker
//!   URLs are templated from already-resolved parts
//! - **Authentication-mode selection**: credential-based login or delegated
//!   OIDC, chosen once from an environment flag
//! - **Boundary rendering**: the typed configuration serializes to the
//!   loosely-typed settings mapping the host application consumes

pub mod config;
pub mod error;
pub mod render;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, Result};

/// Version of the lakeview-config crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
