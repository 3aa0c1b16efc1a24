use crate::helpers::{coordination_id, mount_begin, recorded, request_line, session_for};

use icontrol_core::{IControlError, RequestDescriptor};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Reference expansion through response envelopes
// ============================================================================

/// **VALUE**: Verifies a reference is fetched once, without the coordination header,
/// and stored next to the original field.
///
/// **WHY THIS MATTERS**: Expansion reads run while a transaction may be active; scoping
/// them into the transaction would queue reads instead of returning data.
///
/// **BUG THIS CATCHES**: Would catch the auxiliary GET inheriting the header, the link's
/// host being used instead of the session endpoint, or the reference being removed.
#[tokio::test]
async fn given_pool_reference_when_expanding_then_pool_fetched_without_header() {
    // GIVEN: An active transaction and a virtual server referencing a pool
    let server = MockServer::start().await;
    mount_begin(&server).await;
    Mock::given(method("GET"))
        .and(path("/mgmt/tm/ltm/virtual/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "v1",
            "poolReference": {"link": "https://host/mgmt/tm/ltm/pool/p1?ver=1"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mgmt/tm/ltm/pool/p1"))
        .and(query_param("ver", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "p1"})))
        .expect(1)
        .mount(&server)
        .await;
    let mut session = session_for(&server);
    session.begin_transaction().await.unwrap();

    // WHEN: Fetching and expanding
    let mut response = session.get_virtual("v1").await.unwrap();
    response.expand().await.expect("expansion");

    // THEN: Both keys exist and the pool fetch bypassed the transaction
    assert_eq!(
        response.payload(),
        &json!({
            "name": "v1",
            "poolReference": {"link": "https://host/mgmt/tm/ltm/pool/p1?ver=1"},
            "pool": {"name": "p1"}
        })
    );
    let requests = recorded(&server).await;
    let expansion: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/mgmt/tm/ltm/pool/p1")
        .collect();
    assert_eq!(expansion.len(), 1);
    assert_eq!(request_line(expansion[0]), "GET /mgmt/tm/ltm/pool/p1?ver=1");
    assert_eq!(coordination_id(expansion[0]), None);
}

/// **VALUE**: Verifies several references expand in field order and other fields are
/// left alone.
///
/// **BUG THIS CATCHES**: Would catch recursive expansion into nested objects or
/// fields that merely resemble references.
#[tokio::test]
async fn given_several_references_when_expanding_then_each_fetched_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "b"})))
        .mount(&server)
        .await;
    let session = session_for(&server);
    let mut payload = json!({
        "firstReference": {"link": "https://x/a"},
        "note": "Reference",
        "nested": {"innerReference": {"link": "https://x/never"}},
        "secondReference": {"link": "https://x/b"},
        "listReference": ["https://x/never"]
    });

    session.expand(&mut payload).await.expect("expansion");

    assert_eq!(payload["first"], json!({"id": "a"}));
    assert_eq!(payload["second"], json!({"id": "b"}));
    assert!(payload.get("nested").unwrap().get("inner").is_none());
    assert!(payload.get("list").is_none());
    let lines: Vec<String> = recorded(&server).await.iter().map(request_line).collect();
    assert_eq!(lines, vec!["GET /a", "GET /b"]);
}

/// **VALUE**: Verifies a failing auxiliary fetch fails the expansion.
#[tokio::test]
async fn given_broken_reference_when_expanding_then_api_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mgmt/tm/ltm/pool/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "gone"})))
        .mount(&server)
        .await;
    let session = session_for(&server);
    let mut payload = json!({"poolReference": {"link": "https://x/mgmt/tm/ltm/pool/gone"}});

    let result = session.expand(&mut payload).await;

    assert!(matches!(result, Err(IControlError::Api { .. })));
    assert!(payload.get("pool").is_none());
}

/// **VALUE**: Verifies an envelope outliving its session reports `SessionDropped`.
///
/// **WHY THIS MATTERS**: Envelopes hold only a weak handle; they must not keep a
/// session (and its credentials) alive.
#[tokio::test]
async fn given_dropped_session_when_expanding_then_session_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"poolReference": {"link": "https://x/p"}})),
        )
        .mount(&server)
        .await;
    let session = session_for(&server);
    let mut response = session
        .dispatch(RequestDescriptor::get("/mgmt/tm/ltm/virtual/v1"))
        .await
        .unwrap();
    drop(session);

    let result = response.expand().await.map(|_| ());

    assert!(matches!(result, Err(IControlError::SessionDropped { .. })));
}
