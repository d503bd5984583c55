//! Platten - Playback Session
//!
//! Platform-agnostic playback session for Platten.
//!
//! This crate provides:
//! - A playing queue with play history and lazy shuffle
//! - The player state machine (stopped / playing / paused)
//! - The transport contract with one-shot, generation-tagged completions
//! - A threaded controller that serializes commands onto one worker
//! - Snapshots and events for clients, a media browse tree and the
//!   service presence policy
//!
//! # Architecture
//!
//! `platten-playback` never touches audio output, databases or tag parsing:
//! - Audio output is behind the [`Transport`] trait
//! - Library lookups go through `platten_core::LibraryIndex`
//! - Saving the resume queue goes through `platten_core::PersistenceGateway`
//! - Lyrics come from `platten_core::TagStore`
//!
//! # Example: Driving the session
//!
//! ```rust
//! use platten_core::{Album, MemoryLibrary, Track};
//! use platten_playback::{
//!     Completion, PlaybackState, SessionController, Transport,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! // A transport that accepts every track and never finishes
//! struct Silent;
//!
//! impl Transport for Silent {
//!     fn start(&mut self, _track: &Track, _completion: Completion) -> platten_playback::Result<()> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn resume(&mut self) {}
//!     fn stop(&mut self) {}
//!     fn seek(&mut self, _position_ms: u64) {}
//!     fn position(&self) -> u64 {
//!         0
//!     }
//! }
//!
//! let album = Album::new("a1", "A Love Supreme", "John Coltrane");
//! let track = Track::new("t1", "Acknowledgement", PathBuf::from("/music/t1.flac"))
//!     .on_album(&album);
//! let library = Arc::new(MemoryLibrary::new().with_album(album, vec![track]));
//!
//! let controller = SessionController::builder(library).spawn(Silent).unwrap();
//! controller.play_from_id("t1").unwrap();
//! assert_eq!(controller.snapshot().state, PlaybackState::Playing);
//!
//! controller.pause().unwrap();
//! assert_eq!(controller.snapshot().state, PlaybackState::Paused);
//! controller.shutdown();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod browse;
mod controller;
mod error;
mod events;
mod presence;
mod queue;
mod session;
mod shuffle;
mod transport;
pub mod types;

// Public exports
pub use browse::{MediaBrowser, ALBUM_PREFIX, ROOT_ID};
pub use controller::{
    normalize_lyrics, ControllerBuilder, CustomCommand, SessionCommand, SessionController,
    SUBSCRIBER_CAPACITY,
};
pub use error::{PlaybackError, Result};
pub use events::{PlaybackSnapshot, SessionEvent, TrackBroadcast};
pub use presence::{PresenceChange, PresenceTracker, ServicePresence};
pub use queue::Queue;
pub use session::{PlaybackSession, SessionEffect};
pub use transport::{Completion, CompletionNotifier, Generation, Transport, TransportOutcome};
pub use types::{EndOfQueue, PlaybackConfig, PlaybackState};
