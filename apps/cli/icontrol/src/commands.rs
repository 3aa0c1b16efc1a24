//! What each subcommand does, independent of argument parsing.

use crate::cli::{Cli, Command};
use crate::error::CliError;

use icontrol_core::config::ConnectionConfig;
use icontrol_core::{Method, RequestDescriptor, Session, TransactionId, TransactionStatus};

use std::path::Path;

use log::{debug, error, info, warn};
use serde::Deserialize;
use serde_json::Value;

/// One entry of an `apply` file.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<Value>,
}

impl Operation {
    #[track_caller]
    pub fn to_descriptor(&self) -> Result<RequestDescriptor, CliError> {
        let method = Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())
            .map_err(|e| CliError::cli(format!("Invalid method {:?}: {e}", self.method)))?;

        let mut descriptor = RequestDescriptor::new(method, self.path.as_str());
        if let Some(body) = &self.body {
            descriptor = descriptor.with_body(body.clone());
        }

        Ok(descriptor)
    }
}

pub fn load_operations(path: &Path) -> Result<Vec<Operation>, CliError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::cli(format!("Failed to read {}: {e}", path.display())))?;

    let operations: Vec<Operation> = serde_json::from_str(&contents)?;
    if operations.is_empty() {
        return Err(CliError::cli(format!("{} contains no operations", path.display())));
    }

    Ok(operations)
}

/// File (if any), then `.env`, then the process environment; validated.
pub fn resolve_config(path: Option<&Path>) -> Result<ConnectionConfig, CliError> {
    let config = match path.map(Path::to_path_buf).or_else(ConnectionConfig::default_path) {
        Some(path) => ConnectionConfig::load(&path)?,
        None => ConnectionConfig::default(),
    };

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded .env from {}", path.display()),
        Err(e) => debug!("No .env loaded: {e}"),
    }

    let config = config.with_env_overrides()?;
    config.validate()?;

    Ok(config)
}

pub async fn get(session: &Session, path: &str, expand: bool) -> Result<Value, CliError> {
    let mut response = session.dispatch(RequestDescriptor::get(path)).await?;
    if expand {
        response.expand().await?;
    }

    Ok(response.into_payload())
}

pub async fn pools(session: &Session, expand_subcollections: bool) -> Result<Value, CliError> {
    Ok(session
        .list_pools(expand_subcollections)
        .await?
        .into_payload())
}

/// Runs `operations` inside one transaction and returns the commit payload.
///
/// A failing operation leaves `session` bound to the open transaction. It is
/// then rolled back through `recovery`, which must be an inactive session on
/// the same appliance, and the operation's error is returned.
pub async fn apply(
    session: &mut Session,
    recovery: &Session,
    operations: &[Operation],
) -> Result<Value, CliError> {
    let descriptors = operations
        .iter()
        .map(Operation::to_descriptor)
        .collect::<Result<Vec<_>, _>>()?;

    session.begin_transaction().await?;
    let id = session
        .transaction_state()
        .active_id()
        .cloned()
        .ok_or_else(|| CliError::cli("Transaction did not start"))?;

    for (index, descriptor) in descriptors.into_iter().enumerate() {
        debug!("Operation {index}: {} {}", descriptor.method, descriptor.path);

        if let Err(e) = session.dispatch(descriptor).await {
            error!("Operation {index} failed, rolling back transaction {id}");
            roll_back_quietly(recovery, &id).await;
            return Err(e.into());
        }
    }

    let committed = session.commit_transaction().await?;
    match TransactionStatus::from_payload(committed.payload()) {
        Some(TransactionStatus::Completed) => info!("Transaction {id} completed"),
        Some(status) => warn!("Transaction {id} reported {status:?}"),
        None => warn!("Transaction {id} commit response carried no state"),
    }

    Ok(committed.into_payload())
}

async fn roll_back_quietly(recovery: &Session, id: &TransactionId) {
    if let Err(e) = recovery.rollback_transaction(id).await {
        warn!("Rollback of transaction {id} failed, it will expire on its own: {e}");
    }
}

pub async fn rollback(session: &Session, id: &str) -> Result<Value, CliError> {
    let id = TransactionId::new(id)?;

    Ok(session.rollback_transaction(&id).await?.into_payload())
}

/// Entry point for the binary: resolve config, build sessions, run, print.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(cli.config.as_deref())?;

    let output = match cli.command {
        Command::Get { path, expand } => {
            let session = config.into_session()?;
            get(&session, &path, expand).await?
        }
        Command::Pools {
            expand_subcollections,
        } => {
            let session = config.into_session()?;
            pools(&session, expand_subcollections).await?
        }
        Command::Apply { file } => {
            let operations = load_operations(&file)?;
            let recovery = config.clone().into_session()?;
            let mut session = config.into_session()?;
            apply(&mut session, &recovery, &operations).await?
        }
        Command::Rollback { id } => {
            let session = config.into_session()?;
            rollback(&session, &id).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
