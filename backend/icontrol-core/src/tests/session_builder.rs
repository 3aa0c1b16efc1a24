// Unit tests for the validating session factory

use crate::error::IControlError;
use crate::session::{Session, SessionBuilder};

fn assert_configuration_error(builder: SessionBuilder, expected: &str) {
    match builder.build() {
        Err(IControlError::Configuration { message, .. }) => {
            assert!(
                message.contains(expected),
                "Expected message containing {expected:?}, got {message:?}"
            );
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

/// **VALUE**: Verifies malformed endpoints are rejected at construction.
///
/// **WHY THIS MATTERS**: Paths are appended to the endpoint verbatim; a trailing slash
/// yields `//mgmt/...` and a relative endpoint yields no URL at all.
///
/// **BUG THIS CATCHES**: Would catch the trailing-slash check being lost because
/// `Url::parse` normalises `https://host` to `https://host/`.
#[test]
fn given_bad_endpoints_when_building_then_configuration_error() {
    let with = |endpoint: &str| {
        Session::builder()
            .with_endpoint(endpoint)
            .with_credentials("admin", "admin")
    };

    assert_configuration_error(with("not-a-url"), "Invalid endpoint URL");
    assert_configuration_error(with("https://10.0.0.1/"), "must not end with a slash");
    assert_configuration_error(with("ftp://10.0.0.1"), "absolute http(s) URL");
    assert_configuration_error(with(""), "Endpoint is required");
}

#[test]
fn given_missing_endpoint_when_building_then_configuration_error() {
    let builder = Session::builder().with_credentials("admin", "admin");

    assert_configuration_error(builder, "Endpoint is required");
}

/// **VALUE**: Verifies both credential fields are required and non-empty.
///
/// **BUG THIS CATCHES**: Would catch sessions built with an empty password that then
/// fail every call with a 401 instead of failing fast.
#[test]
fn given_missing_credentials_when_building_then_configuration_error() {
    let endpoint = "https://10.0.0.1";

    assert_configuration_error(Session::builder().with_endpoint(endpoint), "Username is required");
    assert_configuration_error(
        Session::builder()
            .with_endpoint(endpoint)
            .with_credentials("", "admin"),
        "Username is required",
    );
    assert_configuration_error(
        Session::builder()
            .with_endpoint(endpoint)
            .with_credentials("admin", ""),
        "Password is required",
    );
}

#[test]
fn given_valid_settings_when_building_then_session_is_inactive() {
    let session = Session::builder()
        .with_endpoint("https://10.0.0.1:8443")
        .with_credentials("admin", "admin")
        .with_strict_tls(false)
        .build()
        .expect("valid settings");

    assert_eq!(session.base_url(), "https://10.0.0.1:8443");
    assert!(!session.is_in_transaction());
}
