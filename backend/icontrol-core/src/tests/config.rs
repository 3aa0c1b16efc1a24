// Unit tests for connection config loading and overrides

use crate::config::{ConnectionConfig, ENV_ENDPOINT, ENV_PASSWORD, ENV_STRICT_TLS, ENV_USERNAME};
use crate::error::config::ConfigError;

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn given_missing_file_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();

    let config = ConnectionConfig::load(&dir.path().join("config.toml")).unwrap();

    assert!(config.endpoint.is_none());
    assert!(config.strict_tls, "TLS checks default to on");
}

/// **VALUE**: Verifies a complete TOML file loads and validates.
///
/// **BUG THIS CATCHES**: Would catch serde field names drifting from the documented
/// file format, or the password failing to deserialize into a redacted secret.
#[test]
fn given_complete_file_when_loading_then_validates() {
    // GIVEN: A config file
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "endpoint = \"https://10.0.0.1\"\nusername = \"admin\"\npassword = \"secret\"\nstrict_tls = false\n",
    )
    .unwrap();

    // WHEN: Loading
    let config = ConnectionConfig::load(&path).unwrap();

    // THEN: Fields are populated and valid
    assert_eq!(config.endpoint.as_deref(), Some("https://10.0.0.1"));
    assert_eq!(config.password.as_ref().map(|p| p.expose()), Some("secret"));
    assert!(!config.strict_tls);
    assert!(config.validate().is_ok());
    assert!(config.into_session().is_ok());
}

#[test]
fn given_malformed_file_when_loading_then_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "endpoint = [").unwrap();

    let result = ConnectionConfig::load(&path);

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies environment values win over the file.
///
/// **WHY THIS MATTERS**: Passwords are commonly kept out of config files and injected
/// via the environment or a `.env` file.
///
/// **BUG THIS CATCHES**: Would catch overrides being applied in the wrong direction.
#[test]
fn given_env_overrides_when_applied_then_env_wins() {
    let config = ConnectionConfig {
        endpoint: Some(String::from("https://old")),
        ..ConnectionConfig::default()
    };

    let config = config
        .with_overrides_from(lookup(&[
            (ENV_ENDPOINT, "https://10.0.0.2"),
            (ENV_USERNAME, "ops"),
            (ENV_PASSWORD, "pw"),
            (ENV_STRICT_TLS, "false"),
        ]))
        .unwrap();

    assert_eq!(config.endpoint.as_deref(), Some("https://10.0.0.2"));
    assert_eq!(config.username.as_deref(), Some("ops"));
    assert!(!config.strict_tls);
    assert!(config.validate().is_ok());
}

#[test]
fn given_bad_strict_tls_env_when_applied_then_validation_error() {
    let result = ConnectionConfig::default().with_overrides_from(lookup(&[(ENV_STRICT_TLS, "maybe")]));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_trailing_slash_endpoint_when_validating_then_validation_error() {
    let config = ConnectionConfig::default()
        .with_overrides_from(lookup(&[
            (ENV_ENDPOINT, "https://10.0.0.1/"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "admin"),
        ]))
        .unwrap();

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}
