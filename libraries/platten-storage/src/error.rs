/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// The state file exists but does not hold a session record
    #[error("Corrupt session file {path}: {reason}")]
    Corrupt {
        /// File that failed to decode
        path: String,
        /// Decoder message
        reason: String,
    },

    /// The record could not be encoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a corrupt-file error
    pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<StorageError> for platten_core::CoreError {
    fn from(err: StorageError) -> Self {
        platten_core::CoreError::persistence(err.to_string())
    }
}
