use crate::dispatch::{Connection, Credentials, RequestOverrides};
use crate::error::IControlError;
use crate::session::Session;

use common::RedactedSecret;

use url::Url;

/// Validating factory for [`Session`].
///
/// Every check runs in `build`, before any network activity.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<RedactedSecret>,
    strict_tls: Option<bool>,
    overrides: Option<RequestOverrides>,
}

impl SessionBuilder {
    /// Absolute `http`/`https` URL with no trailing slash, e.g. `https://10.0.0.1`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<RedactedSecret>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Defaults to `true`. `false` accepts self-signed appliance certificates.
    pub fn with_strict_tls(mut self, strict_tls: bool) -> Self {
        self.strict_tls = Some(strict_tls);
        self
    }

    /// Unchecked overlay applied to every request; see [`RequestOverrides`].
    pub fn with_overrides(mut self, overrides: RequestOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    #[track_caller]
    pub fn build(self) -> Result<Session, IControlError> {
        let endpoint = validate_endpoint(self.endpoint.as_deref())
            .map_err(|reason| IControlError::configuration(reason))?
            .to_string();

        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| IControlError::configuration("Username is required"))?;

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| IControlError::configuration("Password is required"))?;

        let connection = Connection::new(
            endpoint,
            Credentials { username, password },
            self.strict_tls.unwrap_or(true),
            self.overrides.unwrap_or_default(),
        )?;

        Ok(Session::from_connection(connection))
    }
}

/// Endpoint rules shared with config validation. Returns the reason on failure.
pub(crate) fn validate_endpoint(endpoint: Option<&str>) -> Result<&str, String> {
    let endpoint = match endpoint {
        Some(e) if !e.is_empty() => e,
        _ => return Err(String::from("Endpoint is required")),
    };

    let url = Url::parse(endpoint).map_err(|e| format!("Invalid endpoint URL {endpoint}: {e}"))?;

    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(format!("Endpoint must be an absolute http(s) URL: {endpoint}"));
    }

    if endpoint.ends_with('/') {
        return Err(format!("Endpoint must not end with a slash: {endpoint}"));
    }

    Ok(endpoint)
}
