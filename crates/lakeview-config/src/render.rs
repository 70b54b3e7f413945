//! Boundary serialization of the resolved configuration
//!
//! The host application loads a loosely-typed settings mapping at startup.
//! The strongly-typed [`Config`] converts to that mapping only here, at the
//! boundary; everything inside the crate stays typed.

use serde_json::{json, Map, Value};

use crate::config::{Config, OidcConfig};

/// Keys under which the shared cache parameters are repeated; the host
/// application configures each cache independently but this deployment
/// points them all at the same backend
const CACHE_KEYS: [&str; 4] = [
    "CACHE_CONFIG",
    "DATA_CACHE_CONFIG",
    "FILTER_STATE_CACHE_CONFIG",
    "EXPLORE_FORM_DATA_CACHE_CONFIG",
];

/// Render the settings document the host application consumes.
///
/// Secrets appear in the document (it is the deployment artifact handed to
/// the host process); they never appear in logs or summaries.
pub fn settings_document(config: &Config) -> Value {
    let mut doc = Map::new();

    doc.insert("SECRET_KEY".to_string(), json!(config.secret_key));
    doc.insert(
        "SQLALCHEMY_DATABASE_URI".to_string(),
        json!(config.database.connection_uri()),
    );
    doc.insert(
        "SQLALCHEMY_EXAMPLES_URI".to_string(),
        json!(config.database.examples_uri()),
    );

    doc.insert("WTF_CSRF_ENABLED".to_string(), json!(config.web.csrf.enabled));
    doc.insert(
        "WTF_CSRF_EXEMPT_LIST".to_string(),
        json!(config.web.csrf.exempt),
    );
    doc.insert(
        "ENABLE_PROXY_FIX".to_string(),
        json!(config.web.enable_proxy_fix),
    );
    doc.insert("PROXY_FIX_CONFIG".to_string(), json!(config.web.proxy_fix));

    let cache = cache_section(config);
    for key in CACHE_KEYS {
        doc.insert(key.to_string(), cache.clone());
    }

    doc.insert(
        "TASK_QUEUE_CONFIG".to_string(),
        task_queue_section(config),
    );

    doc.insert("LOG_LEVEL".to_string(), json!(config.logging.level));
    doc.insert("LOG_FORMAT".to_string(), json!(config.logging.format));

    doc.insert("FEATURE_FLAGS".to_string(), json!(config.features.flags));
    doc.insert(
        "SQLLAB_CTAS_NO_LIMIT".to_string(),
        json!(config.features.sqllab_ctas_no_limit),
    );

    doc.insert("AUTH_TYPE".to_string(), json!(config.auth.mode.to_string()));
    if let Some(oidc) = &config.auth.oidc {
        doc.insert("OAUTH_PROVIDERS".to_string(), json!([provider_descriptor(oidc)]));
        doc.insert("AUTH_ROLES_MAPPING".to_string(), json!(oidc.roles_mapping));
        doc.insert(
            "AUTH_ROLES_SYNC_AT_LOGIN".to_string(),
            json!(config.auth.roles_sync_at_login),
        );
        doc.insert(
            "AUTH_USER_REGISTRATION".to_string(),
            json!(config.auth.user_registration),
        );
        doc.insert(
            "AUTH_USER_REGISTRATION_ROLE".to_string(),
            json!(config.auth.user_registration_role),
        );
    }

    Value::Object(doc)
}

fn cache_section(config: &Config) -> Value {
    json!({
        "CACHE_TYPE": "RedisCache",
        "CACHE_DEFAULT_TIMEOUT": config.cache.default_timeout_secs,
        "CACHE_KEY_PREFIX": config.cache.key_prefix,
        "CACHE_REDIS_HOST": config.redis.host,
        "CACHE_REDIS_PORT": config.redis.port,
        "CACHE_REDIS_DB": config.redis.results_db,
    })
}

fn task_queue_section(config: &Config) -> Value {
    let mut beat = Map::new();
    for entry in &config.queue.beat_schedule {
        beat.insert(
            entry.name.clone(),
            json!({ "task": entry.task, "schedule": entry.schedule }),
        );
    }

    json!({
        "broker_url": config.redis.broker_url(),
        "result_backend": config.redis.results_url(),
        "worker_prefetch_multiplier": config.queue.worker_prefetch_multiplier,
        "task_acks_late": config.queue.task_acks_late,
        "beat_schedule": beat,
    })
}

/// Exactly one provider descriptor, named `oidc`
fn provider_descriptor(oidc: &OidcConfig) -> Value {
    let mut provider = json!({
        "name": "oidc",
        "client_id": oidc.client_id,
        "client_secret": oidc.client_secret,
        "server_metadata_url": oidc.discovery_url,
        "api_base_url": oidc.api_base_url(),
        "scopes": oidc.scopes,
        "username_claim": oidc.username_claim,
        "groups_claim": oidc.groups_claim,
    });
    if let Some(redirect_uri) = &oidc.redirect_uri {
        provider["redirect_uri"] = json!(redirect_uri);
    }
    provider
}
