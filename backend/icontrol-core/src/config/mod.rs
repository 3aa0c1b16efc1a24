//! Connection settings from a TOML file plus environment overrides.
//!
//! ```toml
//! endpoint = "https://10.0.0.1"
//! username = "admin"
//! password = "secret"
//! strict_tls = false
//! ```

use crate::error::IControlError;
use crate::error::config::ConfigError;
use crate::session::builder::validate_endpoint;
use crate::session::{Session, SessionBuilder};

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

const CONFIG_DIR_NAME: &str = "icontrol";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_ENDPOINT: &str = "ICONTROL_ENDPOINT";
pub const ENV_USERNAME: &str = "ICONTROL_USERNAME";
pub const ENV_PASSWORD: &str = "ICONTROL_PASSWORD";
pub const ENV_STRICT_TLS: &str = "ICONTROL_STRICT_TLS";

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<RedactedSecret>,
    #[serde(default = "default_strict_tls")]
    pub strict_tls: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            password: None,
            strict_tls: default_strict_tls(),
        }
    }
}

fn default_strict_tls() -> bool {
    true
}

impl ConnectionConfig {
    /// `{config_dir}/icontrol/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults, since the environment may supply
    /// everything. Validation is left to [`ConnectionConfig::validate`] so that
    /// overrides can be applied first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ConnectionConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Apply `ICONTROL_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `ICONTROL_*` overrides from `lookup`. Set values win over the file.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            debug!("Endpoint overridden by {ENV_ENDPOINT}");
            self.endpoint = Some(endpoint);
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            debug!("Username overridden by {ENV_USERNAME}");
            self.username = Some(username);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            debug!("Password overridden by {ENV_PASSWORD}");
            self.password = Some(RedactedSecret::new(password));
        }
        if let Some(strict_tls) = lookup(ENV_STRICT_TLS) {
            self.strict_tls = parse_bool(&strict_tls).ok_or_else(|| {
                ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!("{ENV_STRICT_TLS} must be true or false, got {strict_tls:?}"),
                }
            })?;
        }

        Ok(self)
    }

    /// Same rules the session factory applies, reported as [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason,
        };

        validate_endpoint(self.endpoint.as_deref()).map_err(invalid)?;

        if self.username.as_deref().is_none_or(str::is_empty) {
            return Err(invalid(String::from("Username is required")));
        }

        if self.password.as_ref().is_none_or(RedactedSecret::is_empty) {
            return Err(invalid(String::from("Password is required")));
        }

        Ok(())
    }

    pub fn to_builder(&self) -> SessionBuilder {
        let mut builder = Session::builder().with_strict_tls(self.strict_tls);

        if let Some(endpoint) = &self.endpoint {
            builder = builder.with_endpoint(endpoint.as_str());
        }
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            builder = builder.with_credentials(username.as_str(), password.clone());
        }

        builder
    }

    #[track_caller]
    pub fn into_session(self) -> Result<Session, IControlError> {
        self.to_builder().build()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
