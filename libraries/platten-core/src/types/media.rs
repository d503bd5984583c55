//! Browse-tree entries handed to clients

use serde::{Deserialize, Serialize};

/// Whether a media item can be opened or played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaItemKind {
    /// Has children (an album)
    Browsable,
    /// Can be handed to `play_from_id` (a track)
    Playable,
}

/// A single entry of the media browse tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Media id (`ALBUM-<id>` for albums, the track id for tracks)
    pub media_id: String,
    /// Display title
    pub title: String,
    /// Display subtitle (artist)
    pub subtitle: String,
    /// Cover art reference
    pub cover_uri: Option<String>,
    /// Browsable or playable
    pub kind: MediaItemKind,
}

impl MediaItem {
    /// Whether the item can be played directly
    pub fn is_playable(&self) -> bool {
        self.kind == MediaItemKind::Playable
    }
}
