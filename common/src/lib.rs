//! Shared building blocks for the iControl REST client.
//!
//! Nothing in here knows about sessions or transactions; these are the
//! small value types every other crate in the workspace leans on:
//!
//! - [`ErrorLocation`]: call-site capture for error variants
//! - [`HttpStatusCode`]: status classification without string parsing
//! - [`RedactedSecret`]: credentials that never reach logs

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
