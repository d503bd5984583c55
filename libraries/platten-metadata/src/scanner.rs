/// Library scanner implementation
use crate::error::{MetadataError, Result};
use crate::reader::{FileTags, LoftyTagStore};
use platten_core::{Album, MemoryLibrary, Track};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Artist used when a file names none
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Cover image file names looked up next to the audio files
const COVER_NAMES: &[&str] = &[
    "cover.jpg",
    "cover.png",
    "folder.jpg",
    "folder.png",
    "front.jpg",
    "front.png",
];

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Follow symbolic links (default: false)
    pub follow_links: bool,

    /// Supported audio file extensions
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            extensions: vec![
                "mp3".to_string(),
                "flac".to_string(),
                "ogg".to_string(),
                "opus".to_string(),
                "wav".to_string(),
                "m4a".to_string(),
                "aac".to_string(),
            ],
        }
    }
}

/// Scan statistics
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Number of files discovered
    pub files_discovered: usize,

    /// Number of tracks added to the library
    pub tracks_added: usize,

    /// Number of albums formed
    pub albums: usize,

    /// Errors encountered
    pub errors: Vec<(PathBuf, String)>,
}

/// Scanned files grouped by album, before ids are assigned
#[derive(Default)]
struct AlbumGroup {
    title: String,
    artist: String,
    cover_uri: Option<String>,
    files: Vec<(PathBuf, FileTags)>,
}

/// Library scanner
///
/// Walks a directory, reads the tags of every audio file and groups the
/// tracks into albums by album title and album artist. Files without tags
/// are named after the file and grouped by their directory.
pub struct LibraryScanner {
    reader: LoftyTagStore,
    config: ScanConfig,
}

impl LibraryScanner {
    /// Create a new library scanner
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            reader: LoftyTagStore::new(),
            config,
        }
    }

    /// Scan a directory (or a single file) into an in-memory library
    ///
    /// Unreadable files are recorded in the stats and skipped.
    ///
    /// # Errors
    /// `FileNotFound` if `path` does not exist
    pub fn scan(&self, path: &Path) -> Result<(MemoryLibrary, ScanStats)> {
        let mut stats = ScanStats::default();

        let files = self.discover_files(path)?;
        stats.files_discovered = files.len();
        info!(root = %path.display(), files = files.len(), "Scanning library");

        let root = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };

        let mut groups: BTreeMap<(String, String), AlbumGroup> = BTreeMap::new();
        for file_path in files {
            match self.reader.read_tags(&file_path) {
                Ok(tags) => {
                    let title = tags
                        .album
                        .clone()
                        .filter(|a| !a.is_empty())
                        .unwrap_or_else(|| directory_name(&file_path));
                    let artist = tags
                        .album_artist
                        .clone()
                        .or_else(|| tags.artist.clone())
                        .filter(|a| !a.is_empty())
                        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

                    let group = groups
                        .entry((title.to_lowercase(), artist.to_lowercase()))
                        .or_insert_with(|| AlbumGroup {
                            title,
                            artist,
                            cover_uri: find_cover(&file_path),
                            files: Vec::new(),
                        });
                    group.files.push((file_path, tags));
                }
                Err(e) => {
                    warn!(file = %file_path.display(), error = %e, "Skipping unreadable file");
                    stats.errors.push((file_path, e.to_string()));
                }
            }
        }

        let mut library = MemoryLibrary::new();
        let mut album_ids = HashSet::new();
        for ((title_key, artist_key), group) in groups {
            let album_id = unique_id(
                slug(&format!("{} {}", artist_key, title_key)),
                &mut album_ids,
            );
            let album = Album {
                cover_uri: group.cover_uri.clone(),
                ..Album::new(
                    album_id,
                    group.title.clone(),
                    group.artist.clone(),
                )
            };

            let mut files = group.files;
            files.sort_by(|(a_path, a), (b_path, b)| {
                (a.disc_number, a.track_number, a_path).cmp(&(b.disc_number, b.track_number, b_path))
            });

            let tracks: Vec<Track> = files
                .into_iter()
                .map(|(file_path, tags)| build_track(root, &file_path, tags, &album))
                .collect();

            debug!(album = %album.id, tracks = tracks.len(), "Album formed");
            stats.tracks_added += tracks.len();
            stats.albums += 1;
            library.insert_album(album, tracks);
        }

        info!(
            tracks = stats.tracks_added,
            albums = stats.albums,
            errors = stats.errors.len(),
            "Scan complete"
        );
        Ok((library, stats))
    }

    /// Discover audio files in a directory recursively
    fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let mut files = Vec::new();

        if path.is_file() {
            if self.is_supported_file(path) {
                files.push(path.to_path_buf());
            }
            return Ok(files);
        }

        for entry in walkdir::WalkDir::new(path)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && self.is_supported_file(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if file is a supported audio format
    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.config.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for LibraryScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn build_track(root: &Path, file_path: &Path, tags: FileTags, album: &Album) -> Track {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    let id = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let title = tags
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| file_stem(file_path));

    let mut track = Track::new(id, title, file_path.to_path_buf()).on_album(album);
    if let Some(artist) = tags.artist.filter(|a| !a.is_empty()) {
        track.artist = artist;
    }
    track.duration_ms = tags.duration_ms;
    track
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

fn directory_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown Album")
        .to_string()
}

fn find_cover(file_path: &Path) -> Option<String> {
    let dir = file_path.parent()?;
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|cover| cover.display().to_string())
}

/// Lowercase alphanumeric words joined by dashes
fn slug(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// `base`, or `base-2`, `base-3`, ... when already taken
fn unique_id(base: String, taken: &mut HashSet<String>) -> String {
    let base = if base.is_empty() {
        "album".to_string()
    } else {
        base
    };

    let mut id = base.clone();
    let mut n = 2;
    while taken.contains(&id) {
        id = format!("{}-{}", base, n);
        n += 1;
    }
    taken.insert(id.clone());
    id
}
