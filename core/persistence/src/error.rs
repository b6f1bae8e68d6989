//! FILENAME: core/persistence/src/error.rs

use engine::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}

impl PersistenceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PersistenceError::InvalidFormat(message.into())
    }
}
