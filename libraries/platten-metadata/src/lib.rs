//! Platten Metadata
//!
//! Tag reading and library scanning for the platten playback session.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, AAC, OPUS)
//! - Lyrics lookup behind the `TagStore` collaborator trait
//! - Directory scanning into an in-memory `LibraryIndex`
//!
//! # Example
//!
//! ```rust,no_run
//! use platten_core::{LibraryIndex, TagStore};
//! use platten_metadata::{LibraryScanner, LoftyTagStore};
//! use std::path::Path;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (library, stats) = LibraryScanner::new().scan(Path::new("/music"))?;
//! println!("{} tracks in {} albums", stats.tracks_added, stats.albums);
//!
//! for album in library.albums()? {
//!     println!("{} - {}", album.artist, album.title);
//! }
//!
//! let lyrics = LoftyTagStore::new().lyrics(Path::new("/music/song.flac"))?;
//! # let _ = lyrics;
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;
mod scanner;

pub use error::{MetadataError, Result};
pub use reader::{FileTags, LoftyTagStore};
pub use scanner::{LibraryScanner, ScanConfig, ScanStats, UNKNOWN_ARTIST};
