//! Playing queue with play history and lazy shuffle
//!
//! The queue keeps the tracks in their original order and a separate play
//! order of indices into them:
//!
//! ```text
//! order:   [ 2 | 0   4 | 1   3 ]
//!            ^   ^   ^   ^
//!          floor |  cursor  remainder (not yet played, original order)
//!                history
//! ```
//!
//! Positions before the cursor (down to the floor) are the play history.
//! Positions after the frontier were never drawn. With shuffle on, each
//! `advance()` draws one of them at random, so a pass plays every track
//! exactly once and toggling shuffle never touches the history.

use crate::error::{PlaybackError, Result};
use crate::shuffle::{draw_to_front, random_start};
use platten_core::{SavedQueue, Track};

/// Ordered playlist with a current-position cursor
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Tracks in original order
    tracks: Vec<Track>,

    /// Play order (indices into `tracks`)
    order: Vec<usize>,

    /// Current position in `order`
    cursor: Option<usize>,

    /// First position that counts as history
    floor: usize,

    /// Highest position drawn during this pass
    frontier: usize,

    /// Whether `advance()` draws at random
    shuffled: bool,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and start at `start_index` (into `tracks`)
    ///
    /// Empty input clears the queue. History is reset. With shuffle on, the
    /// start track opens a pass over all the other tracks.
    ///
    /// # Errors
    /// `InvalidIndex` if `start_index` is out of bounds for non-empty input
    pub fn set_items(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if tracks.is_empty() {
            self.clear();
            return Ok(());
        }
        if start_index >= tracks.len() {
            return Err(PlaybackError::InvalidIndex {
                index: start_index,
                len: tracks.len(),
            });
        }

        let len = tracks.len();
        self.tracks = tracks;
        if self.shuffled {
            self.order = Self::order_starting_at(len, start_index);
            self.cursor = Some(0);
            self.floor = 0;
            self.frontier = 0;
        } else {
            self.order = (0..len).collect();
            self.cursor = Some(start_index);
            self.floor = start_index;
            self.frontier = start_index;
        }
        Ok(())
    }

    /// Restore a saved queue: shuffle flag first, then content and position
    ///
    /// A saved index that no longer fits falls back to the first track.
    pub fn restore(&mut self, saved: SavedQueue) {
        self.shuffled = saved.shuffle;
        let start = saved
            .current_index
            .filter(|&i| i < saved.tracks.len())
            .unwrap_or(0);
        // start is in bounds (or the list is empty), so this cannot fail
        let _ = self.set_items(saved.tracks, start);
    }

    /// Snapshot of the queue for persistence
    pub fn to_saved(&self) -> SavedQueue {
        SavedQueue {
            tracks: self.tracks.clone(),
            current_index: self.current_index(),
            shuffle: self.shuffled,
        }
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.order.clear();
        self.cursor = None;
        self.floor = 0;
        self.frontier = 0;
    }

    /// Track at the cursor
    pub fn current(&self) -> Option<&Track> {
        self.cursor.map(|pos| &self.tracks[self.order[pos]])
    }

    /// Index (into the original list) of the current track
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.map(|pos| self.order[pos])
    }

    /// Move to the next track
    ///
    /// Replays forward through history first (after `retreat()`), then draws
    /// from the remainder: in order with shuffle off, uniformly at random with
    /// shuffle on. Returns `None` at the end of the pass without moving.
    pub fn advance(&mut self) -> Option<&Track> {
        let next = self.cursor? + 1;
        if next >= self.order.len() {
            return None;
        }

        if next > self.frontier {
            if self.shuffled {
                draw_to_front(&mut self.order[next..]);
            }
            self.frontier = next;
        }

        self.cursor = Some(next);
        self.current()
    }

    /// Move to the previously played track
    ///
    /// Returns `None` (and stays put) when there is no history.
    pub fn retreat(&mut self) -> Option<&Track> {
        let pos = self.cursor?;
        if pos <= self.floor {
            return None;
        }
        self.cursor = Some(pos - 1);
        self.current()
    }

    /// Start a new pass over the same tracks
    ///
    /// History is cleared. With shuffle on, the first track is random.
    pub fn rewind(&mut self) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        self.order = match random_start(len).filter(|_| self.shuffled) {
            Some(start) => Self::order_starting_at(len, start),
            None => (0..len).collect(),
        };
        self.cursor = Some(0);
        self.floor = 0;
        self.frontier = 0;
        self.current()
    }

    /// Turn shuffle on or off
    ///
    /// Only changes how `advance()` picks from the remainder. The remainder
    /// is always kept in original relative order, so turning shuffle off
    /// needs no reordering.
    pub fn toggle_shuffle(&mut self, enabled: bool) {
        self.shuffled = enabled;
    }

    /// Check if shuffle is on
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Number of tracks after the current one
    pub fn remaining_count(&self) -> usize {
        self.cursor
            .map_or(0, |pos| self.order.len().saturating_sub(pos + 1))
    }

    /// Tracks after the current one, in the order they are known to play
    ///
    /// With shuffle on, undrawn tracks are listed in original order.
    pub fn upcoming(&self) -> Vec<&Track> {
        match self.cursor {
            Some(pos) => self.order[pos + 1..]
                .iter()
                .map(|&i| &self.tracks[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Tracks already played in this pass, oldest first
    pub fn history(&self) -> Vec<&Track> {
        match self.cursor {
            Some(pos) => self.order[self.floor..pos]
                .iter()
                .map(|&i| &self.tracks[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// All tracks in original order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Total number of tracks in queue
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn order_starting_at(len: usize, start: usize) -> Vec<usize> {
        std::iter::once(start)
            .chain((0..len).filter(|&i| i != start))
            .collect()
    }
}
