//! Application layer errors

use std::time::Duration;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while routing free text to a registered action
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No action selected for user {0}")]
    NoActiveAction(String),

    #[error("Action not registered: {0}")]
    UnknownAction(String),

    #[error("Action '{action}' failed: {reason}")]
    ExecutionFailed { action: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Identity lookup errors
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("No user registered for token {0}")]
    NotFound(String),

    #[error("Token {token} is shared by {count} users")]
    Ambiguous { token: String, count: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
