use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("state not found: {key}")]
    NotFound { key: String },

    #[error("invalid state key: {key}")]
    InvalidKey { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
