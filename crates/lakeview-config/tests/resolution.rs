//! End-to-end environment resolution tests
//!
//! Every test runs with the full variable contract cleared first, so ambient
//! environment from the test runner cannot leak in. `temp_env` serializes
//! the tests that mutate the process environment.

use lakeview_config::config::{AuthMode, ConfigValidation};
use lakeview_config::{render, Config, ConfigError};

/// The documented environment contract, cleared before each test
const ALL_VARS: &[&str] = &[
    "LAKEVIEW_SECRET_KEY",
    "DATABASE_DIALECT",
    "DATABASE_USER",
    "DATABASE_PASSWORD",
    "DATABASE_HOST",
    "DATABASE_PORT",
    "DATABASE_DB",
    "EXAMPLES_USER",
    "EXAMPLES_PASSWORD",
    "EXAMPLES_HOST",
    "EXAMPLES_PORT",
    "EXAMPLES_DB",
    "LAKEVIEW__SQLALCHEMY_EXAMPLES_URI",
    "REDIS_HOST",
    "REDIS_PORT",
    "REDIS_BROKER_DB",
    "REDIS_RESULTS_DB",
    "CACHE_DEFAULT_TIMEOUT",
    "CACHE_KEY_PREFIX",
    "LAKEVIEW_LOG_LEVEL",
    "LAKEVIEW_LOG_FORMAT",
    "AUTH_TYPE",
    "OIDC_CLIENT_ID",
    "OIDC_CLIENT_SECRET",
    "OIDC_DISCOVERY_URL",
    "OIDC_SCOPES",
    "OIDC_REDIRECT_URI",
    "OIDC_USERNAME_CLAIM",
    "OIDC_GROUPS_CLAIM",
    "OIDC_ROLES_MAPPING",
    "AUTH_USER_REGISTRATION",
    "AUTH_USER_REGISTRATION_ROLE",
    "AUTH_ROLES_SYNC_AT_LOGIN",
    "LAKEVIEW_FEATURE_FLAGS",
];

fn with_env<R>(overrides: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let mut vars: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|key| (*key, None)).collect();
    for &(key, value) in overrides {
        match vars.iter_mut().find(|entry| entry.0 == key) {
            Some(entry) => entry.1 = Some(value),
            None => vars.push((key, Some(value))),
        }
    }
    temp_env::with_vars(vars, f)
}

const OIDC_BASE: &[(&str, &str)] = &[
    ("LAKEVIEW_SECRET_KEY", "k"),
    ("AUTH_TYPE", "OAUTH"),
    ("OIDC_CLIENT_ID", "lakeview"),
    ("OIDC_CLIENT_SECRET", "s3cret"),
    (
        "OIDC_DISCOVERY_URL",
        "https://idp.example.com/realms/main/.well-known/openid-configuration",
    ),
];

#[test]
fn missing_secret_key_is_fatal() {
    with_env(&[], || {
        let err = Config::from_env().unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingRequired { ref key } if key == "LAKEVIEW_SECRET_KEY"),
            "unexpected error: {err}"
        );
    });
}

#[test]
fn empty_secret_key_counts_as_missing() {
    with_env(&[("LAKEVIEW_SECRET_KEY", "  ")], || {
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::MissingRequired { .. }
        ));
    });
}

#[test]
fn unset_optional_variables_resolve_to_documented_defaults() {
    with_env(&[("LAKEVIEW_SECRET_KEY", "k")], || {
        let config = Config::from_env().unwrap();

        assert_eq!(config.database.dialect, "postgresql");
        assert_eq!(config.database.user, "lakeview");
        assert_eq!(config.database.password, "");
        assert_eq!(config.database.host, "postgres");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.database, "lakeview");

        // Examples database mirrors the primary settings
        assert_eq!(config.database.examples.user, "lakeview");
        assert_eq!(config.database.examples.host, "postgres");
        assert_eq!(config.database.examples.uri_override, None);

        assert_eq!(config.redis.host, "redis");
        assert_eq!(config.redis.port, 6379);
        assert_eq!(config.redis.broker_db, 0);
        assert_eq!(config.redis.results_db, 1);

        assert_eq!(config.cache.default_timeout_secs, 300);
        assert_eq!(config.cache.key_prefix, "lakeview_");

        assert_eq!(config.logging.level, "INFO");
        assert_eq!(config.logging.format, "json");

        assert_eq!(config.auth.mode, AuthMode::Database);
        assert!(config.auth.oidc.is_none());
        assert!(config.auth.user_registration);
        assert_eq!(config.auth.user_registration_role, "Viewer");
        assert!(config.auth.roles_sync_at_login);

        assert_eq!(config.features.flags.get("ALERT_REPORTS"), Some(&true));
    });
}

#[test]
fn connection_uri_round_trip() {
    with_env(
        &[
            ("LAKEVIEW_SECRET_KEY", "k"),
            ("DATABASE_DIALECT", "postgresql"),
            ("DATABASE_USER", "u"),
            ("DATABASE_PASSWORD", "p"),
            ("DATABASE_HOST", "h"),
            ("DATABASE_PORT", "5432"),
            ("DATABASE_DB", "d"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.database.connection_uri(), "postgresql://u:p@h:5432/d");
        },
    );
}

#[test]
fn examples_database_falls_back_field_by_field() {
    with_env(
        &[
            ("LAKEVIEW_SECRET_KEY", "k"),
            ("DATABASE_USER", "app"),
            ("DATABASE_PASSWORD", "pw"),
            ("EXAMPLES_HOST", "replica"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.database.examples.user, "app");
            assert_eq!(config.database.examples.password, "pw");
            assert_eq!(config.database.examples.host, "replica");
            assert_eq!(
                config.database.examples_uri(),
                "postgresql://app:pw@replica:5432/lakeview"
            );
        },
    );
}

#[test]
fn examples_uri_override_wins_wholesale() {
    with_env(
        &[
            ("LAKEVIEW_SECRET_KEY", "k"),
            (
                "LAKEVIEW__SQLALCHEMY_EXAMPLES_URI",
                "postgresql://ro:ro@replica:5432/examples",
            ),
            ("EXAMPLES_HOST", "ignored"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(
                config.database.examples_uri(),
                "postgresql://ro:ro@replica:5432/examples"
            );
        },
    );
}

#[test]
fn unparseable_database_port_is_fatal() {
    with_env(
        &[
            ("LAKEVIEW_SECRET_KEY", "k"),
            ("DATABASE_PORT", "not-a-port"),
        ],
        || {
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidValue { ref key, .. } if key == "DATABASE_PORT"
            ));
        },
    );
}

#[test]
fn broker_and_result_backend_derive_from_redis_settings() {
    with_env(
        &[
            ("LAKEVIEW_SECRET_KEY", "k"),
            ("REDIS_HOST", "cache.internal"),
            ("REDIS_PORT", "6380"),
            ("REDIS_BROKER_DB", "4"),
            ("REDIS_RESULTS_DB", "5"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.redis.broker_url(), "redis://cache.internal:6380/4");
            assert_eq!(config.redis.results_url(), "redis://cache.internal:6380/5");
        },
    );
}

#[test]
fn oauth_mode_produces_one_provider_with_derived_api_base() {
    with_env(OIDC_BASE, || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.auth.mode, AuthMode::Oidc);

        let doc = render::settings_document(&config);
        let providers = doc["OAUTH_PROVIDERS"].as_array().unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0]["name"], "oidc");
        assert_eq!(
            providers[0]["api_base_url"],
            "https://idp.example.com/realms/main/"
        );
    });
}

#[test]
fn auth_type_matching_is_case_insensitive() {
    let mut vars = OIDC_BASE.to_vec();
    vars[1] = ("AUTH_TYPE", "oauth");
    with_env(&vars, || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.auth.mode, AuthMode::Oidc);
        assert!(config.auth.oidc.is_some());
    });
}

#[test]
fn unrecognized_auth_type_falls_back_to_database_mode() {
    // No OIDC variables set; fallback must not require them
    with_env(
        &[("LAKEVIEW_SECRET_KEY", "k"), ("AUTH_TYPE", "LDAP")],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.auth.mode, AuthMode::Database);
            assert!(config.auth.oidc.is_none());
        },
    );
}

#[test]
fn oidc_mode_requires_all_three_credentials() {
    for missing in ["OIDC_CLIENT_ID", "OIDC_CLIENT_SECRET", "OIDC_DISCOVERY_URL"] {
        let vars: Vec<(&str, &str)> = OIDC_BASE
            .iter()
            .copied()
            .filter(|(key, _)| *key != missing)
            .collect();
        with_env(&vars, || {
            let err = Config::from_env().unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingRequired { ref key } if key == missing),
                "expected failure on {missing}, got: {err}"
            );
        });
    }
}

#[test]
fn roles_mapping_override_is_parsed() {
    let mut vars = OIDC_BASE.to_vec();
    vars.push((
        "OIDC_ROLES_MAPPING",
        r#"{"analysts": ["Editor", "Viewer"]}"#,
    ));
    with_env(&vars, || {
        let config = Config::from_env().unwrap();
        let oidc = config.auth.oidc.unwrap();
        assert_eq!(oidc.roles_mapping.len(), 1);
        assert_eq!(oidc.roles_mapping["analysts"], ["Editor", "Viewer"]);
    });
}

#[test]
fn malformed_roles_mapping_is_fatal() {
    let mut vars = OIDC_BASE.to_vec();
    vars.push(("OIDC_ROLES_MAPPING", "admins=Admin"));
    with_env(&vars, || {
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::ParseError { ref key, .. } if key == "OIDC_ROLES_MAPPING"
        ));
    });
}

#[test]
fn default_roles_mapping_applies_when_override_is_absent() {
    with_env(OIDC_BASE, || {
        let config = Config::from_env().unwrap();
        let oidc = config.auth.oidc.unwrap();
        assert_eq!(oidc.roles_mapping["lakeview-admins"], ["Admin"]);
        assert_eq!(oidc.roles_mapping["lakeview-viewers"], ["Viewer"]);
    });
}

#[test]
fn oidc_scope_list_is_comma_separated() {
    let mut vars = OIDC_BASE.to_vec();
    vars.push(("OIDC_SCOPES", "openid, groups"));
    with_env(&vars, || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.auth.oidc.unwrap().scopes, ["openid", "groups"]);
    });
}

#[test]
fn feature_flag_override_merges_over_builtins() {
    with_env(
        &[
            ("LAKEVIEW_SECRET_KEY", "k"),
            ("LAKEVIEW_FEATURE_FLAGS", r#"{"DASHBOARD_RBAC": true}"#),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.features.flags.get("ALERT_REPORTS"), Some(&true));
            assert_eq!(config.features.flags.get("DASHBOARD_RBAC"), Some(&true));
        },
    );
}

#[test]
fn database_mode_with_oidc_variables_set_warns_but_resolves() {
    with_env(
        &[
            ("LAKEVIEW_SECRET_KEY", "k"),
            ("OIDC_CLIENT_ID", "leftover"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.auth.mode, AuthMode::Database);
            assert!(!config.warnings().is_empty());
        },
    );
}
