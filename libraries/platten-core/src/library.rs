//! In-memory library index
//!
//! Used by the directory scanner as its result type and by tests as a
//! stand-in for the platform media index.

use crate::error::Result;
use crate::traits::LibraryIndex;
use crate::types::{Album, AlbumId, Track, TrackId};
use std::collections::HashMap;

/// Library index held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    /// Albums in insertion order
    albums: Vec<Album>,

    /// Tracks per album, in album order
    tracks: HashMap<AlbumId, Vec<Track>>,
}

impl MemoryLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an album with its tracks (builder style)
    #[must_use]
    pub fn with_album(mut self, album: Album, tracks: Vec<Track>) -> Self {
        self.insert_album(album, tracks);
        self
    }

    /// Add or replace an album with its tracks
    ///
    /// The album's `track_count` is set from `tracks`.
    pub fn insert_album(&mut self, mut album: Album, tracks: Vec<Track>) {
        album.track_count = tracks.len() as u32;
        if let Some(existing) = self.albums.iter_mut().find(|a| a.id == album.id) {
            *existing = album.clone();
        } else {
            self.albums.push(album.clone());
        }
        self.tracks.insert(album.id, tracks);
    }

    /// Total number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }

    /// Whether the library holds no albums
    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}

impl LibraryIndex for MemoryLibrary {
    fn albums(&self) -> Result<Vec<Album>> {
        Ok(self.albums.clone())
    }

    fn tracks_by_album(&self, album_id: &AlbumId) -> Result<Vec<Track>> {
        Ok(self.tracks.get(album_id).cloned().unwrap_or_default())
    }

    fn track_by_id(&self, id: &TrackId) -> Result<Option<Track>> {
        Ok(self
            .tracks
            .values()
            .flat_map(|tracks| tracks.iter())
            .find(|t| &t.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_album_tracks(album: &Album, ids: &[&str]) -> Vec<Track> {
        ids.iter()
            .map(|id| {
                Track::new(*id, format!("Track {}", id), PathBuf::from(format!("/music/{}.mp3", id)))
                    .on_album(album)
            })
            .collect()
    }

    #[test]
    fn empty_library() {
        let library = MemoryLibrary::new();
        assert!(library.is_empty());
        assert!(library.albums().unwrap().is_empty());
        assert!(library.track_by_id(&TrackId::new("x")).unwrap().is_none());
    }

    #[test]
    fn lookups_find_tracks_across_albums() {
        let a = Album::new("a", "First", "Artist A");
        let b = Album::new("b", "Second", "Artist B");
        let a_tracks = create_album_tracks(&a, &["1", "2"]);
        let b_tracks = create_album_tracks(&b, &["3"]);

        let library = MemoryLibrary::new()
            .with_album(a, a_tracks)
            .with_album(b, b_tracks);

        assert_eq!(library.track_count(), 3);
        let found = library.track_by_id(&TrackId::new("3")).unwrap().unwrap();
        assert_eq!(found.album, "Second");

        let albums = library.albums().unwrap();
        assert_eq!(albums[0].track_count, 2);
        assert_eq!(albums[1].track_count, 1);
    }

    #[test]
    fn unknown_album_has_no_tracks() {
        let library = MemoryLibrary::new();
        assert!(library
            .tracks_by_album(&AlbumId::new("nope"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn insert_album_replaces_existing() {
        let album = Album::new("a", "Title", "Artist");
        let mut library = MemoryLibrary::new();
        library.insert_album(album.clone(), create_album_tracks(&album, &["1"]));
        library.insert_album(album.clone(), create_album_tracks(&album, &["1", "2"]));

        assert_eq!(library.albums().unwrap().len(), 1);
        assert_eq!(library.tracks_by_album(&album.id).unwrap().len(), 2);
    }
}
