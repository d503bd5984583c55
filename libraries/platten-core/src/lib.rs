//! Platten Core
//!
//! Platform-agnostic domain types and collaborator traits shared by the
//! playback session, the metadata readers and the session store.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album`, `MediaItem`, saved-session records
//! - **Collaborator Traits**: `LibraryIndex`, `PersistenceGateway`, `TagStore`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! Nothing here touches audio output or threads; the playback crate builds
//! on top of these pieces.
//!
//! # Example
//!
//! ```rust
//! use platten_core::{Album, AlbumId, LibraryIndex, MemoryLibrary, Track, TrackId};
//! use std::path::PathBuf;
//!
//! let album = Album::new("a1", "Blue Train", "John Coltrane");
//! let track = Track::new("t1", "Moment's Notice", PathBuf::from("/music/t1.mp3"))
//!     .on_album(&album);
//!
//! let library = MemoryLibrary::new().with_album(album, vec![track]);
//!
//! let found = library.track_by_id(&TrackId::new("t1")).unwrap();
//! assert_eq!(found.unwrap().album_id, AlbumId::new("a1"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod library;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use library::MemoryLibrary;
pub use traits::{LibraryIndex, PersistenceGateway, TagStore};
pub use types::{
    Album, AlbumId, MediaItem, MediaItemKind, NowPlaying, SavedQueue, Track, TrackId,
};
