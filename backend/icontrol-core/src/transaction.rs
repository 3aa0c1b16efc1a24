//! Server-side transactions: begin, commit, rollback, list commands.
//!
//! State machine: `Inactive` -> `Active(id)` -> `Inactive`. Only
//! [`Session::begin_transaction`] and [`Session::commit_transaction`] change
//! the state. The server expires idle transactions on its own; the client
//! neither tracks nor enforces that.

use crate::TM_BASE_PATH;
use crate::dispatch::RequestDescriptor;
use crate::error::IControlError;
use crate::response::ResponseEnvelope;
use crate::session::Session;

use std::fmt;

use const_format::concatcp;
use log::info;
use serde_json::{Value, json};

pub const TRANSACTION_PATH: &str = concatcp!(TM_BASE_PATH, "/transaction");

const TRANSACTION_ID_FIELD: &str = "transId";
const TRANSACTION_STATE_FIELD: &str = "state";
const COMMIT_REQUEST_STATE: &str = "VALIDATING";

const ALREADY_IN_TRANSACTION: &str = "already in transaction mode";
const NOT_IN_TRANSACTION: &str = "not in transaction mode";
const IN_TRANSACTION: &str = "in transaction mode";

/// Server-issued transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    /// Rejects empty ids and anything that could not travel in a header.
    #[track_caller]
    pub fn new(id: impl Into<String>) -> Result<Self, IControlError> {
        let id = id.into();

        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(IControlError::operation(format!(
                "Invalid transaction id: {id:?}"
            )));
        }

        Ok(Self(id))
    }

    /// Reads `transId`, which the server sends as a number.
    #[track_caller]
    fn from_payload(payload: &Value, url: &str) -> Result<Self, IControlError> {
        match payload.get(TRANSACTION_ID_FIELD) {
            Some(Value::Number(n)) => Self::new(n.to_string()),
            Some(Value::String(s)) => Self::new(s.as_str()),
            _ => Err(IControlError::invalid_response(
                format!("Missing {TRANSACTION_ID_FIELD} in transaction response"),
                url,
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransactionState {
    #[default]
    Inactive,
    Active {
        id: TransactionId,
    },
}

impl TransactionState {
    pub fn is_active(&self) -> bool {
        matches!(self, TransactionState::Active { .. })
    }

    pub fn active_id(&self) -> Option<&TransactionId> {
        match self {
            TransactionState::Active { id } => Some(id),
            TransactionState::Inactive => None,
        }
    }
}

/// Server-reported transaction state, as found in the `state` field of
/// transaction resources (notably the commit response).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Started,
    Validating,
    Completed,
    Failed,
    Other(String),
}

impl TransactionStatus {
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let state = payload.get(TRANSACTION_STATE_FIELD)?.as_str()?;

        Some(match state {
            "STARTED" => TransactionStatus::Started,
            "VALIDATING" => TransactionStatus::Validating,
            "COMPLETED" => TransactionStatus::Completed,
            "FAILED" => TransactionStatus::Failed,
            other => TransactionStatus::Other(other.to_string()),
        })
    }
}

fn transaction_path(id: &TransactionId) -> String {
    format!("{TRANSACTION_PATH}/{id}")
}

impl Session {
    /// Opens a transaction and binds this session to it.
    ///
    /// Every later dispatch carries the coordination header until
    /// [`Session::commit_transaction`].
    ///
    /// # Errors
    /// `Operation` if a transaction is already active (state is unchanged);
    /// any dispatch failure of the creation call.
    pub async fn begin_transaction(&mut self) -> Result<&mut Self, IControlError> {
        if self.transaction.is_active() {
            return Err(IControlError::operation(ALREADY_IN_TRANSACTION));
        }

        let response = self
            .dispatch(RequestDescriptor::post(TRANSACTION_PATH).with_body(json!({})))
            .await?;
        let id = TransactionId::from_payload(
            response.payload(),
            &format!("{}{TRANSACTION_PATH}", self.base_url()),
        )?;

        info!("Transaction {id} started");
        self.transaction = TransactionState::Active { id };

        Ok(self)
    }

    /// Asks the server to validate and apply the active transaction.
    ///
    /// The session returns to `Inactive` before the request is sent, so the
    /// commit call itself never carries the coordination header. The server's
    /// verdict is in the returned payload (see [`TransactionStatus`]); local
    /// state does not reflect it.
    ///
    /// # Errors
    /// `Operation` if no transaction is active (nothing is sent).
    pub async fn commit_transaction(&mut self) -> Result<ResponseEnvelope, IControlError> {
        let id = match std::mem::take(&mut self.transaction) {
            TransactionState::Active { id } => id,
            TransactionState::Inactive => {
                return Err(IControlError::operation(NOT_IN_TRANSACTION));
            }
        };

        info!("Committing transaction {id}");

        self.dispatch(
            RequestDescriptor::patch(transaction_path(&id))
                .with_body(json!({ TRANSACTION_STATE_FIELD: COMMIT_REQUEST_STATE }))
                .ignoring_transaction(),
        )
        .await
    }

    /// Deletes transaction `id` on the server.
    ///
    /// Requires this session to be `Inactive`; the id need not be one this
    /// session created. Session state is not touched.
    ///
    /// # Errors
    /// `Operation` if this session has an active transaction.
    pub async fn rollback_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<ResponseEnvelope, IControlError> {
        if self.transaction.is_active() {
            return Err(IControlError::operation(IN_TRANSACTION));
        }

        info!("Rolling back transaction {id}");

        self.dispatch(RequestDescriptor::delete(transaction_path(id)))
            .await
    }

    /// Lists the commands queued in the active transaction.
    ///
    /// # Errors
    /// `Operation` if no transaction is active.
    pub async fn transaction_commands(&self) -> Result<ResponseEnvelope, IControlError> {
        let id = self
            .transaction
            .active_id()
            .ok_or_else(|| IControlError::operation(NOT_IN_TRANSACTION))?;

        self.dispatch(RequestDescriptor::get(format!(
            "{}/commands",
            transaction_path(id)
        )))
        .await
    }
}
