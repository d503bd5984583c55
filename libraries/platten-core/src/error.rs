/// Core error types for Platten
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared by all collaborator implementations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Library index failures (scan, lookup)
    #[error("Library error: {0}")]
    Library(String),

    /// Session persistence failures
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Tag reading failures
    #[error("Tag error: {0}")]
    Tags(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity ("track", "album")
        entity: String,
        /// Requested id
        id: String,
    },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a library error
    pub fn library(msg: impl Into<String>) -> Self {
        Self::Library(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a tag error
    pub fn tags(msg: impl Into<String>) -> Self {
        Self::Tags(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}
