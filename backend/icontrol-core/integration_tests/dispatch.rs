use crate::helpers::{TEST_PASSWORD, TEST_USERNAME, coordination_id, recorded, session_for};

use icontrol_core::{IControlError, RequestDescriptor, Session};

use common::HttpStatusCode;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Dispatch outcome classification against a mocked control plane
// ============================================================================

/// **VALUE**: Verifies a 200 response yields its parsed body unchanged.
///
/// **WHY THIS MATTERS**: Payload keys are vendor-defined; the envelope must not
/// reshape, rename or drop anything.
///
/// **BUG THIS CATCHES**: Would catch payload normalisation creeping into dispatch, or
/// missing Basic auth / JSON headers on the wire.
#[tokio::test]
async fn given_200_response_when_dispatching_then_payload_equals_body() {
    // GIVEN: A server answering with a pool
    let server = MockServer::start().await;
    let body = json!({
        "kind": "tm:ltm:pool:poolstate",
        "name": "p1",
        "membersReference": {"link": "https://localhost/mgmt/tm/ltm/pool/~Common~p1/members?ver=13.1.0"}
    });
    Mock::given(method("GET"))
        .and(path("/mgmt/tm/ltm/pool/p1"))
        .and(basic_auth(TEST_USERNAME, TEST_PASSWORD))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let session = session_for(&server);

    // WHEN: Dispatching a GET
    let response = session
        .dispatch(RequestDescriptor::get("/mgmt/tm/ltm/pool/p1"))
        .await
        .expect("200 should succeed");

    // THEN: Payload is the body, verbatim
    assert_eq!(response.status(), HttpStatusCode(200));
    assert_eq!(response.payload(), &body);
}

/// **VALUE**: Verifies a 404 maps to an API failure with the server's message.
///
/// **BUG THIS CATCHES**: Would catch reqwest's status error swallowing the body, or the
/// failure being reported as a transport problem.
#[tokio::test]
async fn given_404_with_message_when_dispatching_then_api_failure() {
    // GIVEN: A server rejecting the path
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mgmt/tm/ltm/pool/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"code": 404, "message": "not found"})),
        )
        .mount(&server)
        .await;
    let session = session_for(&server);

    // WHEN: Dispatching
    let result = session
        .dispatch(RequestDescriptor::get("/mgmt/tm/ltm/pool/missing"))
        .await;

    // THEN: ApiFailure{404, "not found"}
    match result {
        Err(IControlError::Api {
            message,
            status_code,
            ..
        }) => {
            assert_eq!(message, "not found");
            assert_eq!(status_code, HttpStatusCode(404));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

/// **VALUE**: Pins the literal-200 success rule on the wire.
///
/// **WHY THIS MATTERS**: The client treats only 200 as success. A 201 or 204 is
/// reported as a failure carrying that status so callers can decide.
///
/// **BUG THIS CATCHES**: Would catch `is_success()` replacing the literal check.
#[tokio::test]
async fn given_201_response_when_dispatching_then_api_failure_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mgmt/tm/ltm/pool"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "p1"})))
        .mount(&server)
        .await;
    let session = session_for(&server);

    let result = session
        .dispatch(RequestDescriptor::post("/mgmt/tm/ltm/pool").with_body(json!({"name": "p1"})))
        .await;

    match result {
        Err(error) => {
            assert_eq!(error.status_code(), Some(HttpStatusCode(201)));
        }
        Ok(response) => panic!("201 must not count as success: {response:?}"),
    }
}

#[tokio::test]
async fn given_body_when_dispatching_then_json_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mgmt/tm/ltm/pool"))
        .and(body_json(json!({"name": "p1", "monitor": "http"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "p1"})))
        .expect(1)
        .mount(&server)
        .await;
    let session = session_for(&server);

    let result = session
        .dispatch(
            RequestDescriptor::post("/mgmt/tm/ltm/pool")
                .with_body(json!({"name": "p1", "monitor": "http"})),
        )
        .await;

    assert!(result.is_ok(), "Body should match: {result:?}");
}

/// **VALUE**: Verifies an unreachable appliance is a transport failure.
///
/// **BUG THIS CATCHES**: Would catch connection errors being mislabelled as API
/// failures (there is no status code to report).
#[tokio::test]
async fn given_unreachable_endpoint_when_dispatching_then_transport_failure() {
    // GIVEN: A port with nothing listening
    let session = Session::builder()
        .with_endpoint("http://127.0.0.1:1")
        .with_credentials(TEST_USERNAME, TEST_PASSWORD)
        .build()
        .unwrap();

    // WHEN: Dispatching
    let result = session
        .dispatch(RequestDescriptor::get("/mgmt/tm/sys/version"))
        .await;

    // THEN: Transport failure without a status
    match result {
        Err(IControlError::Transport { url, .. }) => {
            assert_eq!(url, "http://127.0.0.1:1/mgmt/tm/sys/version");
        }
        other => panic!("Expected Transport error, got {other:?}"),
    }
}

/// **VALUE**: Verifies the fixed 2000 ms timeout applies.
///
/// **WHY THIS MATTERS**: There is no cancellation; a hung appliance must not hang the
/// caller indefinitely.
///
/// **BUG THIS CATCHES**: Would catch the per-request timeout being dropped.
#[tokio::test]
async fn given_slow_server_when_dispatching_then_timeout_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mgmt/tm/sys/version"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&server)
        .await;
    let session = session_for(&server);

    let result = session
        .dispatch(RequestDescriptor::get("/mgmt/tm/sys/version"))
        .await;

    match result {
        Err(error) => assert!(error.is_timeout(), "Expected timeout, got {error:?}"),
        Ok(response) => panic!("Expected timeout, got {response:?}"),
    }
}

#[tokio::test]
async fn given_inactive_session_when_dispatching_then_no_coordination_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let session = session_for(&server);

    session
        .dispatch(RequestDescriptor::get("/mgmt/tm/sys/version"))
        .await
        .unwrap();

    let requests = recorded(&server).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(coordination_id(&requests[0]), None);
}
