/// Track domain type
use crate::types::{Album, AlbumId, TrackId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Audio track as fetched from the library index
///
/// Immutable once fetched; the only field filled in later is `lyrics`,
/// which the playback session attaches to its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album title
    pub album: String,

    /// Album the track belongs to
    pub album_id: AlbumId,

    /// Track duration in milliseconds
    pub duration_ms: u64,

    /// Cover art reference (file path or URI)
    pub cover_uri: Option<String>,

    /// File path on disk
    pub file_path: PathBuf,

    /// Lyrics, loaded lazily from the file tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: String::new(),
            album: String::new(),
            album_id: AlbumId::new(""),
            duration_ms: 0,
            cover_uri: None,
            file_path,
            lyrics: None,
        }
    }

    /// Attach album information (title, id, cover, and artist when unset)
    #[must_use]
    pub fn on_album(mut self, album: &Album) -> Self {
        self.album.clone_from(&album.title);
        self.album_id = album.id.clone();
        if self.cover_uri.is_none() {
            self.cover_uri.clone_from(&album.cover_uri);
        }
        if self.artist.is_empty() {
            self.artist.clone_from(&album.artist);
        }
        self
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
