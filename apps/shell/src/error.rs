//! # Shell Errors
//!
//! Startup failures. Anything that goes wrong after the stores are mounted
//! is handled (and logged) by the stores themselves.

use otorite_client::ApiError;
use otorite_storage::StorageError;
use thiserror::Error;

pub type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Backend client: {0}")]
    Client(#[from] ApiError),

    #[error("Local storage: {0}")]
    Storage(#[from] StorageError),
}
