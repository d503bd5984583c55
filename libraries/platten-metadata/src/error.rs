/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File or directory not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Tag parsing error
    #[error("Tag parsing error: {0}")]
    ParseError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for platten_core::CoreError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FileNotFound(path) => platten_core::CoreError::not_found("file", path),
            other => platten_core::CoreError::tags(other.to_string()),
        }
    }
}
