use crate::helpers::{
    TEST_TRANSACTION_ID, TRANSACTION_ENDPOINT, coordination_id, mount_begin, recorded,
    request_line, session_for,
};

use icontrol_core::{IControlError, TransactionId, TransactionState, TransactionStatus};

use serde_json::{Value, json};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Transaction lifecycle against a mocked control plane
// ============================================================================

/// **VALUE**: End-to-end begin -> create -> commit, checking the header on each call.
///
/// **WHY THIS MATTERS**: This is the whole point of the subsystem: writes made between
/// begin and commit are queued server-side and applied atomically.
///
/// **BUG THIS CATCHES**: Would catch the create call missing the coordination header
/// (applied immediately), or the commit call carrying it (the server rejects a
/// transaction that references itself).
#[tokio::test]
async fn given_begin_create_commit_when_run_then_header_only_on_create() {
    // GIVEN: A server accepting begin, pool creation and commit
    let server = MockServer::start().await;
    mount_begin(&server).await;
    Mock::given(method("POST"))
        .and(path("/mgmt/tm/ltm/pool"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "p1"})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{TRANSACTION_ENDPOINT}/{TEST_TRANSACTION_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transId": TEST_TRANSACTION_ID,
            "state": "COMPLETED"
        })))
        .mount(&server)
        .await;
    let mut session = session_for(&server);

    // WHEN: Running the lifecycle
    session.begin_transaction().await.expect("begin");
    assert!(session.is_in_transaction());
    session.create_pool(json!({"name": "p1"})).await.expect("create");
    let commit = session.commit_transaction().await.expect("commit");

    // THEN: Three calls, header only on the create
    let requests = recorded(&server).await;
    let lines: Vec<String> = requests.iter().map(request_line).collect();
    assert_eq!(
        lines,
        vec![
            format!("POST {TRANSACTION_ENDPOINT}"),
            String::from("POST /mgmt/tm/ltm/pool"),
            format!("PATCH {TRANSACTION_ENDPOINT}/{TEST_TRANSACTION_ID}"),
        ]
    );
    assert_eq!(coordination_id(&requests[0]), None);
    assert_eq!(
        coordination_id(&requests[1]),
        Some(TEST_TRANSACTION_ID.to_string())
    );
    assert_eq!(coordination_id(&requests[2]), None);

    // AND: Commit asked for validation and the server's verdict is readable
    let commit_body: Value = serde_json::from_slice(&requests[2].body).unwrap();
    assert_eq!(commit_body, json!({"state": "VALIDATING"}));
    assert_eq!(
        TransactionStatus::from_payload(commit.payload()),
        Some(TransactionStatus::Completed)
    );
    assert_eq!(session.transaction_state(), &TransactionState::Inactive);
}

/// **VALUE**: Verifies begin twice fails the second time without a second POST.
///
/// **BUG THIS CATCHES**: Would catch a second transaction being opened on the server
/// and the first id being overwritten locally.
#[tokio::test]
async fn given_begin_twice_when_run_then_second_fails_and_id_kept() {
    let server = MockServer::start().await;
    mount_begin(&server).await;
    let mut session = session_for(&server);

    session.begin_transaction().await.expect("first begin");
    let second = session.begin_transaction().await.map(|_| ());

    assert!(matches!(second, Err(IControlError::Operation { .. })));
    assert_eq!(
        session.transaction_state().active_id(),
        Some(&TransactionId::new(TEST_TRANSACTION_ID.to_string()).unwrap())
    );
    assert_eq!(recorded(&server).await.len(), 1);
}

/// **VALUE**: Verifies commit on an inactive session sends nothing.
///
/// **BUG THIS CATCHES**: Would catch the precondition being checked after dispatch.
#[tokio::test]
async fn given_inactive_session_when_commit_then_no_request_sent() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut session = session_for(&server);

    let result = session.commit_transaction().await;

    assert!(matches!(result, Err(IControlError::Operation { .. })));
}

/// **VALUE**: Verifies local state is cleared even when the server rejects the commit.
///
/// **WHY THIS MATTERS**: State goes `Inactive` before the commit is sent. Callers learn
/// the outcome only from the commit result.
///
/// **BUG THIS CATCHES**: Would catch state being cleared only on success, leaving
/// later calls scoped into a dead transaction.
#[tokio::test]
async fn given_commit_rejected_when_committing_then_state_already_inactive() {
    let server = MockServer::start().await;
    mount_begin(&server).await;
    Mock::given(method("PATCH"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": 400, "message": "transaction failed"})),
        )
        .mount(&server)
        .await;
    let mut session = session_for(&server);
    session.begin_transaction().await.unwrap();

    let result = session.commit_transaction().await;

    match result {
        Err(IControlError::Api { message, .. }) => assert_eq!(message, "transaction failed"),
        other => panic!("Expected Api error, got {other:?}"),
    }
    assert!(!session.is_in_transaction());
}

/// **VALUE**: Verifies a begin response without `transId` fails and leaves the
/// session inactive.
#[tokio::test]
async fn given_begin_response_without_id_when_begin_then_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TRANSACTION_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "STARTED"})))
        .mount(&server)
        .await;
    let mut session = session_for(&server);

    let result = session.begin_transaction().await.map(|_| ());

    assert!(matches!(result, Err(IControlError::InvalidResponse { .. })));
    assert!(!session.is_in_transaction());
}

/// **VALUE**: Verifies rollback deletes an arbitrary id from an inactive session.
///
/// **BUG THIS CATCHES**: Would catch rollback using session state instead of the
/// id it was given, or sending a coordination header.
#[tokio::test]
async fn given_inactive_session_when_rollback_then_delete_sent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{TRANSACTION_ENDPOINT}/555")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let session = session_for(&server);

    let result = session
        .rollback_transaction(&TransactionId::new("555").unwrap())
        .await;

    assert!(result.is_ok(), "Rollback should succeed: {result:?}");
    assert_eq!(coordination_id(&recorded(&server).await[0]), None);
}

#[tokio::test]
async fn given_active_transaction_when_listing_commands_then_uses_current_id() {
    let server = MockServer::start().await;
    mount_begin(&server).await;
    Mock::given(method("GET"))
        .and(path(format!(
            "{TRANSACTION_ENDPOINT}/{TEST_TRANSACTION_ID}/commands"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;
    let mut session = session_for(&server);
    session.begin_transaction().await.unwrap();

    let commands = session.transaction_commands().await.expect("commands");

    assert_eq!(commands.payload(), &json!({"items": []}));
    assert!(session.is_in_transaction());
}
