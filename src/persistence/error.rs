//! Storage error type

use thiserror::Error;

/// Why a storage call failed
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage rejected `{key}`: {reason}")]
    Rejected { key: String, reason: String },
}
