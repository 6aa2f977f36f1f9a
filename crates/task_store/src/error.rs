//! Task store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during task store operations.
///
/// A missing record is not an error: updates return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The flat-file artifact exists but could not be decoded.
    #[error("Task file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document store driver error.
    #[cfg(feature = "mongodb")]
    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    /// A record could not be encoded as a document.
    #[error("Document encode error: {0}")]
    DocumentEncode(#[from] bson::ser::Error),

    /// A stored document could not be decoded as a record.
    #[error("Document decode error: {0}")]
    DocumentDecode(#[from] bson::de::Error),

    /// Invalid or unsupported configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TaskStoreError {
    /// Creates a corrupt file error.
    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error reports an undecodable flat file.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
