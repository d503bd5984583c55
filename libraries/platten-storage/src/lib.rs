//! Platten Storage
//!
//! File-backed persistence for the playback session: the saved queue and
//! the now-playing metadata live together in one JSON document that is
//! replaced atomically on every save.
//!
//! # Example
//!
//! ```rust,no_run
//! use platten_core::PersistenceGateway;
//! use platten_storage::JsonSessionStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonSessionStore::new("/var/lib/platten/session.json");
//!
//! if let Some((queue, now_playing)) = store.load()? {
//!     println!("{} queued, last played {}", queue.tracks.len(), now_playing.title);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod session_store;

pub use error::{Result, StorageError};
pub use session_store::{JsonSessionStore, SessionRecord};
