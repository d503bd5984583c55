//! Media browse tree
//!
//! Two levels: the root lists albums, an album lists its tracks. The last
//! track listing handed out is remembered, since the shuffle-all command
//! plays whatever the client was looking at.

use crate::error::{PlaybackError, Result};
use platten_core::{AlbumId, LibraryIndex, MediaItem, MediaItemKind, Track};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Id of the browse root
pub const ROOT_ID: &str = "__ROOT__";

/// Prefix of album media ids
pub const ALBUM_PREFIX: &str = "ALBUM-";

/// Browse tree over a library index
///
/// Cheap to clone; clones share the remembered listing.
#[derive(Clone)]
pub struct MediaBrowser {
    library: Arc<dyn LibraryIndex>,
    last_listing: Arc<Mutex<Vec<Track>>>,
}

impl MediaBrowser {
    /// Create a browser over `library`
    pub fn new(library: Arc<dyn LibraryIndex>) -> Self {
        Self {
            library,
            last_listing: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// List the children of `parent_id`
    ///
    /// Accepts the root id, an album media id (`ALBUM-<id>`) or a bare album
    /// id.
    ///
    /// # Errors
    /// `UnknownParent` when the id is neither the root nor a known album
    pub fn children(&self, parent_id: &str) -> Result<Vec<MediaItem>> {
        if parent_id == ROOT_ID {
            return self.albums();
        }

        let album_id = AlbumId::new(parent_id.strip_prefix(ALBUM_PREFIX).unwrap_or(parent_id));
        let tracks = self.library.tracks_by_album(&album_id)?;
        if tracks.is_empty() {
            return Err(PlaybackError::UnknownParent(parent_id.to_string()));
        }

        debug!(album = %album_id, tracks = tracks.len(), "Listing album");
        let items = tracks.iter().map(track_item).collect();
        self.remember(tracks);
        Ok(items)
    }

    /// Tracks of the most recent album listing
    pub fn last_listing(&self) -> Vec<Track> {
        self.last_listing
            .lock()
            .map(|listing| listing.clone())
            .unwrap_or_default()
    }

    fn albums(&self) -> Result<Vec<MediaItem>> {
        let albums = self.library.albums()?;
        Ok(albums
            .into_iter()
            .map(|album| MediaItem {
                media_id: format!("{}{}", ALBUM_PREFIX, album.id),
                title: album.title,
                subtitle: album.artist,
                cover_uri: album.cover_uri,
                kind: MediaItemKind::Browsable,
            })
            .collect())
    }

    fn remember(&self, tracks: Vec<Track>) {
        if let Ok(mut listing) = self.last_listing.lock() {
            *listing = tracks;
        }
    }
}

fn track_item(track: &Track) -> MediaItem {
    MediaItem {
        media_id: track.id.to_string(),
        title: track.title.clone(),
        subtitle: track.artist.clone(),
        cover_uri: track.cover_uri.clone(),
        kind: MediaItemKind::Playable,
    }
}
