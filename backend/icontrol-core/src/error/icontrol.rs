//! Error taxonomy for sessions, dispatch and the transaction lifecycle.
//!
//! - `Configuration` and `Operation` are raised before any network activity
//! - `Transport` means no HTTP response was obtained
//! - `Api` means a response arrived with a status other than 200
//!
//! Nothing here is retried; `HttpStatusCode::is_retryable` exists for callers
//! that want to.

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum IControlError {
    #[error("Configuration Error: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Operation Error: {message} {location}")]
    Operation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Transport Error: {url}: {message} {location}")]
    Transport {
        message: String,
        url: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("API Error: HTTP {status_code} {url}: {message} {location}")]
    Api {
        message: String,
        status_code: HttpStatusCode,
        url: String,
        location: ErrorLocation,
    },

    #[error("Invalid Response Error: {url}: {message} {location}")]
    InvalidResponse {
        message: String,
        url: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Session Dropped Error: the issuing session no longer exists {location}")]
    SessionDropped { location: ErrorLocation },
}

impl IControlError {
    #[track_caller]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_response(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            url: url.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// HTTP status for `Api` failures.
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { is_timeout: true, .. })
    }
}

impl From<url::ParseError> for IControlError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        IControlError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for IControlError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        IControlError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
