//! Core types for the playback session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing playing; initial state
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl PlaybackState {
    /// Whether the transport holds a track (playing or paused)
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        };
        f.write_str(tag)
    }
}

/// What happens when the last track of the queue finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfQueue {
    /// Stop playback
    #[default]
    Stop,

    /// Start a new pass over the queue
    Loop,
}

/// Configuration for the playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// End-of-queue policy (default: Stop)
    pub end_of_queue: EndOfQueue,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Save the resume queue when pausing (default: true)
    pub persist_on_pause: bool,

    /// Fetch lyrics whenever the track changes (default: true)
    pub prefetch_lyrics: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            end_of_queue: EndOfQueue::Stop,
            shuffle: false,
            persist_on_pause: true,
            prefetch_lyrics: true,
        }
    }
}
