use icontrol::commands::{Operation, apply};
use icontrol::error::CliError;

use icontrol_core::Session;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRANSACTION_ID: u64 = 42;

fn session_for(server: &MockServer) -> Session {
    Session::builder()
        .with_endpoint(server.uri())
        .with_credentials("admin", "admin")
        .build()
        .expect("Failed to build session")
}

async fn mount_begin(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/mgmt/tm/transaction"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"transId": TRANSACTION_ID})),
        )
        .mount(server)
        .await;
}

fn operation(method: &str, path: &str) -> Operation {
    Operation {
        method: method.to_string(),
        path: path.to_string(),
        body: Some(json!({"name": "p1"})),
    }
}

/// **VALUE**: Verifies `apply` wraps the operations in one committed transaction.
///
/// **BUG THIS CATCHES**: Would catch operations being sent outside the transaction or
/// the commit never being issued.
#[tokio::test]
async fn given_operations_when_apply_then_committed_in_one_transaction() {
    // GIVEN: A server accepting begin, a pool and commit
    let server = MockServer::start().await;
    mount_begin(&server).await;
    Mock::given(method("POST"))
        .and(path("/mgmt/tm/ltm/pool"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/mgmt/tm/transaction/{TRANSACTION_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"transId": TRANSACTION_ID, "state": "COMPLETED"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let mut session = session_for(&server);
    let recovery = session_for(&server);

    // WHEN: Applying one operation
    let result = apply(&mut session, &recovery, &[operation("POST", "/mgmt/tm/ltm/pool")]).await;

    // THEN: The commit payload comes back
    let payload = result.expect("apply should succeed");
    assert_eq!(payload["state"], "COMPLETED");
    assert!(!session.is_in_transaction());
}

/// **VALUE**: Verifies a failing operation triggers rollback through the recovery
/// session and surfaces the original error.
///
/// **WHY THIS MATTERS**: The working session is still bound to the transaction and
/// may not roll back; only an inactive session can.
///
/// **BUG THIS CATCHES**: Would catch the rollback being attempted on the active
/// session (refused locally) and the transaction left to expire.
#[tokio::test]
async fn given_failing_operation_when_apply_then_rolled_back() {
    let server = MockServer::start().await;
    mount_begin(&server).await;
    Mock::given(method("POST"))
        .and(path("/mgmt/tm/ltm/pool"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "already exists"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/mgmt/tm/transaction/{TRANSACTION_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let mut session = session_for(&server);
    let recovery = session_for(&server);

    let result = apply(&mut session, &recovery, &[operation("POST", "/mgmt/tm/ltm/pool")]).await;

    match result {
        Err(CliError::Core(error)) => assert!(error.to_string().contains("already exists")),
        other => panic!("Expected core error, got {other:?}"),
    }
}
