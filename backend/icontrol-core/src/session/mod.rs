pub mod builder;

pub use builder::SessionBuilder;

use crate::dispatch::{Connection, RequestDescriptor, dispatch};
use crate::error::IControlError;
use crate::reference::expand_references;
use crate::response::ResponseEnvelope;
use crate::transaction::TransactionState;

use std::sync::Arc;

use serde_json::Value;

/// The user-facing handle: connection plus transaction state.
///
/// Lifecycle calls that change the transaction state take `&mut self`, so
/// overlapping begin/commit on one session cannot be expressed.
#[derive(Debug)]
pub struct Session {
    pub(crate) connection: Arc<Connection>,
    pub(crate) transaction: TransactionState,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub(crate) fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Arc::new(connection),
            transaction: TransactionState::Inactive,
        }
    }

    pub fn base_url(&self) -> &str {
        self.connection.base_url()
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn transaction_state(&self) -> &TransactionState {
        &self.transaction
    }

    pub fn is_in_transaction(&self) -> bool {
        self.transaction.is_active()
    }

    /// Issues one call, scoped into the active transaction unless the
    /// descriptor opts out.
    pub async fn dispatch(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ResponseEnvelope, IControlError> {
        dispatch(&self.connection, descriptor, self.transaction.active_id()).await
    }

    /// Expands the top-level reference fields of any payload, e.g. one that was
    /// deserialised or assembled by the caller. Non-object payloads are ignored.
    pub async fn expand(&self, payload: &mut Value) -> Result<(), IControlError> {
        match payload {
            Value::Object(fields) => expand_references(&self.connection, fields).await,
            _ => Ok(()),
        }
    }
}
