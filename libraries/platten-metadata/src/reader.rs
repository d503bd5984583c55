/// Tag reader implementation using lofty
use crate::error::{MetadataError, Result};
use lofty::{AudioFile, ItemKey, TaggedFileExt};
use platten_core::TagStore;
use std::path::Path;

/// Tags of one audio file, as far as the library needs them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTags {
    /// Track title
    pub title: Option<String>,
    /// Track artist
    pub artist: Option<String>,
    /// Album title
    pub album: Option<String>,
    /// Album artist
    pub album_artist: Option<String>,
    /// Position on the album
    pub track_number: Option<u32>,
    /// Disc number
    pub disc_number: Option<u32>,
    /// Playing time in milliseconds
    pub duration_ms: u64,
}

/// Tag reader using the lofty library
///
/// Implements [`TagStore`] for lyrics and reads the library tags for the
/// scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    /// Create a new tag reader
    pub fn new() -> Self {
        Self
    }

    /// Read the library tags of `path`
    ///
    /// A file without tags yields empty fields and its duration.
    pub fn read_tags(&self, path: &Path) -> Result<FileTags> {
        let tagged_file = Self::open(path)?;

        let mut tags = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first())
            .map(extract_tags)
            .unwrap_or_default();
        tags.duration_ms = tagged_file.properties().duration().as_millis() as u64;

        Ok(tags)
    }

    /// Read the lyrics of `path`
    pub fn read_lyrics(&self, path: &Path) -> Result<Option<String>> {
        let tagged_file = Self::open(path)?;
        Ok(tagged_file.tags().iter().find_map(lyrics_from_tag))
    }

    fn open(path: &Path) -> Result<lofty::TaggedFile> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }
        Ok(lofty::read_from_path(path)?)
    }
}

impl TagStore for LoftyTagStore {
    fn lyrics(&self, path: &Path) -> platten_core::Result<Option<String>> {
        Ok(self.read_lyrics(path)?)
    }
}

/// Non-empty lyrics stored in `tag`
pub(crate) fn lyrics_from_tag(tag: &lofty::Tag) -> Option<String> {
    tag.get_string(&ItemKey::Lyrics)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn extract_tags(tag: &lofty::Tag) -> FileTags {
    let mut tags = FileTags::default();

    // lofty 0.18 API - iterate through items
    for item in tag.items() {
        let text = item.value().text().map(|s| s.trim().to_string());
        match item.key() {
            ItemKey::TrackTitle => tags.title = text,
            ItemKey::TrackArtist => tags.artist = text,
            ItemKey::AlbumTitle => tags.album = text,
            ItemKey::AlbumArtist => tags.album_artist = text,
            ItemKey::TrackNumber => tags.track_number = text.and_then(|t| parse_number(&t)),
            ItemKey::DiscNumber => tags.disc_number = text.and_then(|t| parse_number(&t)),
            _ => {}
        }
    }

    tags
}

/// Parse "3" as well as "3/12"
fn parse_number(text: &str) -> Option<u32> {
    text.split('/').next()?.trim().parse().ok()
}
