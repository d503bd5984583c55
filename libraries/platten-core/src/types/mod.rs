//! Domain types

mod album;
mod ids;
mod media;
mod session;
mod track;

pub use album::Album;
pub use ids::{AlbumId, TrackId};
pub use media::{MediaItem, MediaItemKind};
pub use session::{NowPlaying, SavedQueue};
pub use track::Track;
