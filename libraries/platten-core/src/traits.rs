/// Collaborator traits for the playback session
///
/// The session core never talks to a media index, a database or a tag
/// library directly; it goes through these seams. All of them may block, so
/// the playback worker only calls them where waiting is acceptable (library
/// lookups) or hands them to helper threads (saves, lyrics).
use crate::error::Result;
use crate::types::{Album, AlbumId, NowPlaying, SavedQueue, Track, TrackId};
use std::path::Path;

/// Read-only view of the music library
pub trait LibraryIndex: Send + Sync {
    /// All albums, in display order
    fn albums(&self) -> Result<Vec<Album>>;

    /// Tracks of one album, in album order
    ///
    /// Unknown albums yield an empty list.
    fn tracks_by_album(&self, album_id: &AlbumId) -> Result<Vec<Track>>;

    /// Look up a single track
    fn track_by_id(&self, id: &TrackId) -> Result<Option<Track>>;
}

/// Storage for the resume queue
pub trait PersistenceGateway: Send + Sync {
    /// Save the queue together with the current track's metadata
    ///
    /// # Errors
    /// Returns an error if the record cannot be written
    fn save(&self, queue: &SavedQueue, now_playing: &NowPlaying) -> Result<()>;

    /// Load the last saved queue, if any
    ///
    /// # Errors
    /// Returns an error if a record exists but cannot be read
    fn load(&self) -> Result<Option<(SavedQueue, NowPlaying)>>;
}

/// Access to lyrics stored in audio file tags
pub trait TagStore: Send + Sync {
    /// Read the lyrics of the file at `path`
    ///
    /// Returns `Ok(None)` when the file carries no lyrics.
    fn lyrics(&self, path: &Path) -> Result<Option<String>>;
}
