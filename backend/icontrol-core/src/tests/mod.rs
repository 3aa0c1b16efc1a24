mod classify;
mod config;
mod dispatch;
mod reference;
mod session_builder;
mod transaction;

use crate::session::Session;
use crate::transaction::{TransactionId, TransactionState};

/// Endpoint nothing listens on; tests using it must fail before the network.
pub(crate) const OFFLINE_ENDPOINT: &str = "http://127.0.0.1:9";

pub(crate) fn offline_session() -> Session {
    Session::builder()
        .with_endpoint(OFFLINE_ENDPOINT)
        .with_credentials("admin", "admin")
        .build()
        .expect("offline session should build")
}

pub(crate) fn activate(session: &mut Session, id: &str) {
    session.transaction = TransactionState::Active {
        id: TransactionId::new(id).expect("valid id"),
    };
}
