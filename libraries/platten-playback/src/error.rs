//! Error types for the playback session

use platten_core::CoreError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Start index outside the track list
    #[error("Invalid index {index} for queue of {len} tracks")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Queue length
        len: usize,
    },

    /// The library has no track with this id
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Nothing to play
    #[error("Queue is empty")]
    EmptyQueue,

    /// The audio engine could not play a track
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Saving or loading the resume queue failed
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Library lookup failed
    #[error("Library error: {0}")]
    Library(String),

    /// Browse request for an id that is neither root nor an album
    #[error("Unknown parent id: {0}")]
    UnknownParent(String),

    /// A session thread could not be started
    #[error("Failed to start session thread: {0}")]
    Worker(String),

    /// The session worker is no longer running
    #[error("Session worker has shut down")]
    ChannelClosed,
}

impl PlaybackError {
    /// Whether the error only means "nothing happened"
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::EmptyQueue)
    }
}

impl From<CoreError> for PlaybackError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } if entity == "track" => Self::TrackNotFound(id),
            CoreError::Persistence(msg) => Self::PersistenceFailure(msg),
            other => Self::Library(other.to_string()),
        }
    }
}

impl<T> From<crossbeam_channel::SendError<T>> for PlaybackError {
    fn from(_: crossbeam_channel::SendError<T>) -> Self {
        Self::ChannelClosed
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_playback_kinds() {
        let err: PlaybackError = CoreError::not_found("track", "t9").into();
        assert_eq!(err, PlaybackError::TrackNotFound("t9".to_string()));

        let err: PlaybackError = CoreError::persistence("disk full").into();
        assert_eq!(err, PlaybackError::PersistenceFailure("disk full".to_string()));

        let err: PlaybackError = CoreError::library("index offline").into();
        assert!(matches!(err, PlaybackError::Library(_)));
    }

    #[test]
    fn empty_queue_is_noop() {
        assert!(PlaybackError::EmptyQueue.is_noop());
        assert!(!PlaybackError::TrackNotFound("x".into()).is_noop());
    }
}
