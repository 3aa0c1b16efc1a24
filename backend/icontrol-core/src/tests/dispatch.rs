// Unit tests for request option computation
// No network: these inspect the options dispatch would send

use super::{OFFLINE_ENDPOINT, activate, offline_session};

use crate::dispatch::{COORDINATION_HEADER, REQUEST_TIMEOUT, RequestDescriptor, RequestOverrides};
use crate::session::Session;

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::json;

/// **VALUE**: Verifies the URL is a plain concatenation of base URL and path.
///
/// **BUG THIS CATCHES**: Would catch `Url::join` semantics sneaking in, which drop
/// path segments of the base or mangle paths without a leading slash.
#[test]
fn given_descriptor_when_building_options_then_url_is_base_plus_path() {
    // GIVEN: A session and a path with a query string
    let session = offline_session();
    let descriptor = RequestDescriptor::get("/mgmt/tm/ltm/pool?expandSubcollections=true");

    // WHEN: Building options
    let options = session.connection().build_options(&descriptor, None).unwrap();

    // THEN: URL, method, timeout and content type are the computed defaults
    assert_eq!(
        options.url.as_str(),
        format!("{OFFLINE_ENDPOINT}/mgmt/tm/ltm/pool?expandSubcollections=true")
    );
    assert_eq!(options.method, Method::GET);
    assert_eq!(options.timeout, REQUEST_TIMEOUT);
    assert_eq!(REQUEST_TIMEOUT, Duration::from_millis(2000));
    assert_eq!(
        options.headers.get(CONTENT_TYPE),
        Some(&HeaderValue::from_static("application/json"))
    );
    assert_eq!(options.credentials.username, "admin");
}

/// **VALUE**: Verifies the coordination header follows the transaction state.
///
/// **WHY THIS MATTERS**: A request missing the header runs outside the transaction
/// and is applied immediately; a stray header pulls a read into a transaction.
///
/// **BUG THIS CATCHES**: Would catch the `ignore_transaction` flag being ignored, or
/// the header being sent while inactive.
#[test]
fn given_active_transaction_when_building_options_then_header_honours_opt_out() {
    // GIVEN: A session with an active transaction
    let mut session = offline_session();
    activate(&mut session, "1389812351");
    let id = session.transaction_state().active_id().cloned();

    // WHEN: Building a normal and an opted-out request
    let scoped = session
        .connection()
        .build_options(&RequestDescriptor::post("/mgmt/tm/ltm/pool"), id.as_ref())
        .unwrap();
    let bypass = session
        .connection()
        .build_options(
            &RequestDescriptor::get("/mgmt/tm/ltm/pool").ignoring_transaction(),
            id.as_ref(),
        )
        .unwrap();

    // THEN: Only the scoped request carries the id
    assert_eq!(
        scoped.headers.get(COORDINATION_HEADER),
        Some(&HeaderValue::from_static("1389812351"))
    );
    assert!(bypass.headers.get(COORDINATION_HEADER).is_none());
}

#[test]
fn given_inactive_session_when_building_options_then_no_coordination_header() {
    let session = offline_session();

    let options = session
        .connection()
        .build_options(&RequestDescriptor::get("/mgmt/tm/sys/version"), None)
        .unwrap();

    assert!(options.headers.get(COORDINATION_HEADER).is_none());
}

#[test]
fn given_body_when_building_options_then_body_is_carried() {
    let session = offline_session();
    let descriptor = RequestDescriptor::post("/mgmt/tm/ltm/pool").with_body(json!({"name": "p1"}));

    let options = session.connection().build_options(&descriptor, None).unwrap();

    assert_eq!(options.body, Some(json!({"name": "p1"})));
}

/// **VALUE**: Verifies the overlay wins over every computed field it sets.
///
/// **WHY THIS MATTERS**: The overlay is the documented escape hatch; it must apply
/// last, including replacing the whole header map.
///
/// **BUG THIS CATCHES**: Would catch the overlay being applied before the defaults,
/// or headers being merged instead of replaced.
#[test]
fn given_overrides_when_building_options_then_last_write_wins() {
    // GIVEN: A session whose overlay replaces method, headers and timeout
    let mut headers = HeaderMap::new();
    headers.insert("x-custom", HeaderValue::from_static("1"));
    let overrides = RequestOverrides::default()
        .with_method(Method::PUT)
        .with_headers(headers)
        .with_timeout(Duration::from_secs(30));
    let mut session = Session::builder()
        .with_endpoint(OFFLINE_ENDPOINT)
        .with_credentials("admin", "admin")
        .with_overrides(overrides)
        .build()
        .unwrap();
    activate(&mut session, "77");
    let id = session.transaction_state().active_id().cloned();

    // WHEN: Building a transaction-scoped GET
    let options = session
        .connection()
        .build_options(&RequestDescriptor::get("/mgmt/tm/ltm/pool"), id.as_ref())
        .unwrap();

    // THEN: The overlay replaced everything it names, dropping the coordination header
    assert_eq!(options.method, Method::PUT);
    assert_eq!(options.timeout, Duration::from_secs(30));
    assert!(options.headers.get("x-custom").is_some());
    assert!(options.headers.get(COORDINATION_HEADER).is_none());
    assert!(options.headers.get(CONTENT_TYPE).is_none());
}

#[test]
fn given_empty_overrides_when_checked_then_is_empty() {
    assert!(RequestOverrides::default().is_empty());
    assert!(!RequestOverrides::default().with_strict_tls(false).is_empty());
}
