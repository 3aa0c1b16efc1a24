// Unit tests for transaction state-machine preconditions
// Every case here must fail before touching the (offline) network

use super::{activate, offline_session};

use crate::error::IControlError;
use crate::transaction::{TransactionId, TransactionState, TransactionStatus};

use serde_json::json;

fn assert_operation_error<T: std::fmt::Debug>(result: Result<T, IControlError>, expected: &str) {
    match result {
        Err(IControlError::Operation { message, .. }) => assert_eq!(message, expected),
        other => panic!("Expected Operation error, got {other:?}"),
    }
}

/// **VALUE**: Verifies a second begin is refused and the first id survives.
///
/// **WHY THIS MATTERS**: Nested transactions are not supported; silently replacing
/// the id would orphan every command queued so far.
///
/// **BUG THIS CATCHES**: Would catch the precondition being checked after the state
/// is overwritten.
#[tokio::test]
async fn given_active_transaction_when_begin_then_operation_error_and_state_kept() {
    // GIVEN: An active transaction
    let mut session = offline_session();
    activate(&mut session, "100");

    // WHEN: Beginning again
    let result = session.begin_transaction().await.map(|_| ());

    // THEN: Refused, original id kept
    assert_operation_error(result, "already in transaction mode");
    assert_eq!(
        session.transaction_state(),
        &TransactionState::Active {
            id: TransactionId::new("100").unwrap()
        }
    );
}

/// **VALUE**: Verifies commit while inactive fails without a network call.
///
/// **BUG THIS CATCHES**: Would catch a PATCH to `/transaction/` with no id. The
/// offline endpoint turns any attempted call into a Transport error instead.
#[tokio::test]
async fn given_inactive_session_when_commit_then_operation_error() {
    let mut session = offline_session();

    let result = session.commit_transaction().await;

    assert_operation_error(result, "not in transaction mode");
    assert!(!session.is_in_transaction());
}

/// **VALUE**: Pins the rollback precondition: the session must be inactive.
///
/// **WHY THIS MATTERS**: Rollback addresses an explicit transaction id, typically from
/// a separate inactive session. The asymmetry with commit is intentional here.
///
/// **BUG THIS CATCHES**: Would catch someone "fixing" the check to require an
/// active transaction.
#[tokio::test]
async fn given_active_transaction_when_rollback_then_operation_error() {
    let mut session = offline_session();
    activate(&mut session, "100");
    let id = TransactionId::new("100").unwrap();

    let result = session.rollback_transaction(&id).await;

    assert_operation_error(result, "in transaction mode");
    assert!(session.is_in_transaction());
}

#[tokio::test]
async fn given_inactive_session_when_listing_commands_then_operation_error() {
    let session = offline_session();

    let result = session.transaction_commands().await;

    assert_operation_error(result, "not in transaction mode");
}

#[test]
fn given_invalid_ids_when_creating_transaction_id_then_rejected() {
    assert!(TransactionId::new("").is_err());
    assert!(TransactionId::new("12 34").is_err());
    assert!(TransactionId::new("12\n").is_err());
    assert_eq!(TransactionId::new("1389812351").unwrap().as_str(), "1389812351");
}

#[test]
fn given_commit_payloads_when_reading_status_then_states_map() {
    assert_eq!(
        TransactionStatus::from_payload(&json!({"transId": 1, "state": "COMPLETED"})),
        Some(TransactionStatus::Completed)
    );
    assert_eq!(
        TransactionStatus::from_payload(&json!({"state": "FAILED"})),
        Some(TransactionStatus::Failed)
    );
    assert_eq!(
        TransactionStatus::from_payload(&json!({"state": "UNKNOWN"})),
        Some(TransactionStatus::Other(String::from("UNKNOWN")))
    );
    assert_eq!(TransactionStatus::from_payload(&json!({"transId": 1})), None);
}
