//! Error types for the TUI.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::persistence::PersistenceError;
use trackboard_core::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
