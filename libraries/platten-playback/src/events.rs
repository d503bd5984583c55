//! Session events
//!
//! Event-based communication with clients. The session emits:
//! - A fresh snapshot after every transition
//! - State changes (play/pause/stop)
//! - Track changes, plus a metadata broadcast for the new track
//! - Lyrics once they have been read for the current track
//! - Errors recovered at the session boundary

use crate::types::PlaybackState;
use platten_core::{NowPlaying, Track, TrackId};
use serde::{Deserialize, Serialize};

/// Immutable view of the session after a transition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// State tag
    pub state: PlaybackState,

    /// Current track, with lyrics attached once loaded
    pub track: Option<Track>,

    /// Elapsed position in milliseconds
    pub position_ms: u64,

    /// Tracks left after the current one
    pub songs_left: usize,

    /// Shuffle flag
    pub shuffle: bool,

    /// Short queue: the tracks after the current one
    pub upcoming: Vec<Track>,

    /// Playback generation the snapshot was taken at
    pub generation: u64,
}

impl PlaybackSnapshot {
    /// Id of the current track
    pub fn track_id(&self) -> Option<&TrackId> {
        self.track.as_ref().map(|t| &t.id)
    }

    /// Metadata record for persistence
    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.track
            .as_ref()
            .map(|t| NowPlaying::from_track(t, self.position_ms, self.songs_left))
    }
}

/// Metadata announced to the outside world whenever the track changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackBroadcast {
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Album title
    pub album: String,
    /// Cover art reference
    pub cover_uri: Option<String>,
}

impl From<&Track> for TrackBroadcast {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            cover_uri: track.cover_uri.clone(),
        }
    }
}

/// Events emitted by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Playback state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// The current track changed
    TrackChanged {
        /// Id of the new track
        track_id: TrackId,
        /// Id of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Metadata of the new track, for notification and remote displays
    MetadataBroadcast(TrackBroadcast),

    /// Lyrics were read for the current track
    LyricsLoaded {
        /// Track the lyrics belong to
        track_id: TrackId,
        /// Lyrics text
        lyrics: String,
    },

    /// New snapshot after a transition
    Snapshot(PlaybackSnapshot),

    /// A command failed or a collaborator reported an error
    Error {
        /// Error message
        message: String,
    },
}

impl SessionEvent {
    /// Create an error event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Check if this is a snapshot
    pub fn is_snapshot(&self) -> bool {
        matches!(self, Self::Snapshot(_))
    }
}
