//! Records exchanged with the session store

use super::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// The playing queue as saved for a later resume
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedQueue {
    /// Queue content in original order
    pub tracks: Vec<Track>,

    /// Index (into `tracks`) of the track that was current
    pub current_index: Option<usize>,

    /// Whether shuffle was enabled
    #[serde(default)]
    pub shuffle: bool,
}

impl SavedQueue {
    /// Whether there is anything worth restoring
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Metadata of the current track at the time of saving
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Track id
    pub track_id: TrackId,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Album title
    pub album: String,
    /// Cover art reference
    pub cover_uri: Option<String>,
    /// Track duration in milliseconds
    pub duration_ms: u64,
    /// Elapsed position in milliseconds
    pub position_ms: u64,
    /// Tracks left after this one
    pub songs_left: usize,
}

impl NowPlaying {
    /// Build the metadata record for `track`
    pub fn from_track(track: &Track, position_ms: u64, songs_left: usize) -> Self {
        Self {
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            cover_uri: track.cover_uri.clone(),
            duration_ms: track.duration_ms,
            position_ms,
            songs_left,
        }
    }
}
