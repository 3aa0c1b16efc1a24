//! Turns a transport outcome into success or a typed failure.

use crate::error::IControlError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use serde_json::Value;

const MESSAGE_FIELD: &str = "message";

/// No HTTP response was obtained (connect failure, timeout, broken body).
#[track_caller]
pub fn transport_failure(error: &reqwest::Error, url: &str) -> IControlError {
    IControlError::Transport {
        message: error.to_string(),
        url: url.to_string(),
        is_timeout: error.is_timeout(),
        is_connection: error.is_connect(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// A response arrived with any status other than 200.
#[track_caller]
pub fn api_failure(status_code: HttpStatusCode, body: &[u8], url: &str) -> IControlError {
    IControlError::Api {
        message: extract_message(body),
        status_code,
        url: url.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// The body's `message` string, or empty when the body has none.
///
/// Never fails: an unreadable error body must not mask the status code.
pub fn extract_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get(MESSAGE_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default()
}

/// Parses a 200 body. An empty body becomes `null`.
#[track_caller]
pub fn parse_payload(body: &[u8], url: &str) -> Result<Value, IControlError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body).map_err(|e| {
        IControlError::InvalidResponse {
            message: format!("Response body is not JSON: {e}"),
            url: url.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })
}
