pub mod config;
pub mod icontrol;

pub use config::ConfigError;
pub use icontrol::IControlError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    IControl(#[from] icontrol::IControlError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
