use icontrol_core::IControlError;
use icontrol_core::error::{ConfigError, CoreError};

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the `icontrol` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad input to the CLI itself (operation files, arguments)
    #[error("CLI Error: {message} {location}")]
    Cli {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn cli(message: impl Into<String>) -> Self {
        CliError::Cli {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<IControlError> for CliError {
    fn from(error: IControlError) -> Self {
        CliError::Core(CoreError::IControl(error))
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Core(CoreError::Config(error))
    }
}

impl From<serde_json::Error> for CliError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        CliError::Cli {
            message: format!("JSON: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
