//! Album types

use super::AlbumId;
use serde::{Deserialize, Serialize};

/// An album in the library index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album identifier
    pub id: AlbumId,
    /// Album title
    pub title: String,
    /// Album artist
    pub artist: String,
    /// Number of tracks on the album
    pub track_count: u32,
    /// Cover art reference (file path or URI)
    pub cover_uri: Option<String>,
}

impl Album {
    /// Create an album without cover art
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: AlbumId::new(id),
            title: title.into(),
            artist: artist.into(),
            track_count: 0,
            cover_uri: None,
        }
    }
}
