//! Client for the iControl REST control plane.
//!
//! A [`Session`] authenticates every call, injects the transaction
//! coordination header while a transaction is active, and classifies each
//! HTTP outcome into success or an [`IControlError`]. Responses carry a weak
//! handle back to their session so that link-only `*Reference` fields can be
//! expanded in place.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod reference;
pub mod resources;
pub mod response;
pub mod session;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use dispatch::{Credentials, RequestDescriptor, RequestOptions, RequestOverrides};
pub use error::IControlError;
pub use response::ResponseEnvelope;
pub use session::{Session, SessionBuilder};
pub use transaction::{TransactionId, TransactionState, TransactionStatus};

pub use reqwest::Method;
pub use reqwest::header::HeaderMap;

/// Root of every traffic-management resource path.
pub const TM_BASE_PATH: &str = "/mgmt/tm";
