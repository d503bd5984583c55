//! Service presence policy
//!
//! Maps the playback state to how a hosting service should present itself:
//! in the foreground with a notification while playing, in the background
//! with a notification while paused, and gone once stopped.

use crate::events::PlaybackSnapshot;
use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// How the hosting service presents itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServicePresence {
    /// Foreground service with an ongoing notification
    Foreground,

    /// Background service; the notification stays but can be dismissed
    Background,

    /// Notification removed and service released
    Released,
}

impl ServicePresence {
    /// Presence required by `state`
    pub fn for_state(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Playing => Self::Foreground,
            PlaybackState::Paused => Self::Background,
            PlaybackState::Stopped => Self::Released,
        }
    }

    /// Whether a notification should be shown
    pub fn shows_notification(self) -> bool {
        !matches!(self, Self::Released)
    }
}

/// Presence change with the data a notification needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceChange {
    /// New presence
    pub presence: ServicePresence,
    /// Notification title (track title)
    pub title: Option<String>,
    /// Notification text (artist)
    pub text: Option<String>,
}

/// Turns snapshots into presence changes
///
/// Only reports when the presence actually changes.
#[derive(Debug, Clone)]
pub struct PresenceTracker {
    current: ServicePresence,
}

impl PresenceTracker {
    /// Start released, like a fresh session
    pub fn new() -> Self {
        Self {
            current: ServicePresence::Released,
        }
    }

    /// Current presence
    pub fn current(&self) -> ServicePresence {
        self.current
    }

    /// Feed a snapshot; returns the change it causes, if any
    pub fn observe(&mut self, snapshot: &PlaybackSnapshot) -> Option<PresenceChange> {
        let presence = ServicePresence::for_state(snapshot.state);
        if presence == self.current {
            return None;
        }
        self.current = presence;

        let track = snapshot.track.as_ref().filter(|_| presence.shows_notification());
        Some(PresenceChange {
            presence,
            title: track.map(|t| t.title.clone()),
            text: track.map(|t| t.artist.clone()),
        })
    }
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platten_core::Track;
    use std::path::PathBuf;

    fn snapshot(state: PlaybackState) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state,
            track: Some(
                Track::new("t", "Naima", PathBuf::from("/m/t.mp3")).with_artist("John Coltrane"),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn presence_per_state() {
        assert_eq!(
            ServicePresence::for_state(PlaybackState::Playing),
            ServicePresence::Foreground
        );
        assert_eq!(
            ServicePresence::for_state(PlaybackState::Paused),
            ServicePresence::Background
        );
        assert_eq!(
            ServicePresence::for_state(PlaybackState::Stopped),
            ServicePresence::Released
        );
        assert!(!ServicePresence::Released.shows_notification());
    }

    #[test]
    fn tracker_reports_only_changes() {
        let mut tracker = PresenceTracker::new();
        assert!(tracker.observe(&snapshot(PlaybackState::Stopped)).is_none());

        let change = tracker.observe(&snapshot(PlaybackState::Playing)).unwrap();
        assert_eq!(change.presence, ServicePresence::Foreground);
        assert_eq!(change.title.as_deref(), Some("Naima"));
        assert_eq!(change.text.as_deref(), Some("John Coltrane"));

        assert!(tracker.observe(&snapshot(PlaybackState::Playing)).is_none());

        let change = tracker.observe(&snapshot(PlaybackState::Paused)).unwrap();
        assert_eq!(change.presence, ServicePresence::Background);

        let change = tracker.observe(&snapshot(PlaybackState::Stopped)).unwrap();
        assert_eq!(change.presence, ServicePresence::Released);
        assert!(change.title.is_none());
        assert_eq!(tracker.current(), ServicePresence::Released);
    }
}
