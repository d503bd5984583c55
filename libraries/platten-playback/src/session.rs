//! Playback session - the player state machine
//!
//! Coordinates queue, transport and library lookups. The session is
//! synchronous and single-owner: the controller's worker thread holds it and
//! feeds it one command at a time. Anything that would block (saving the
//! resume queue, reading lyrics) is returned as a [`SessionEffect`] for the
//! owner to run elsewhere.

use crate::{
    error::{PlaybackError, Result},
    events::{PlaybackSnapshot, SessionEvent, TrackBroadcast},
    queue::Queue,
    shuffle::random_start,
    transport::{Completion, CompletionNotifier, Generation, Transport, TransportOutcome},
    types::{EndOfQueue, PlaybackConfig, PlaybackState},
};
use platten_core::{LibraryIndex, NowPlaying, SavedQueue, Track, TrackId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Work the session wants done outside the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Save the resume queue
    Persist {
        /// Queue content, position and shuffle flag
        queue: SavedQueue,
        /// Current track metadata
        now_playing: NowPlaying,
    },

    /// Read lyrics for the track that just became current
    FetchLyrics {
        /// Track the lyrics are for
        track_id: TrackId,
        /// Audio file to read
        path: PathBuf,
    },
}

/// Player state machine
pub struct PlaybackSession<T: Transport> {
    state: PlaybackState,
    queue: Queue,
    transport: T,
    library: Arc<dyn LibraryIndex>,
    config: PlaybackConfig,

    // Bumped on every transport start/stop
    generation: Generation,
    notifier: CompletionNotifier,

    // Lyrics of the current track, once loaded
    lyrics: Option<(TrackId, String)>,

    // Completion that arrived while paused; applied by the next `play()`
    ended_while_paused: Option<(Generation, TransportOutcome)>,

    pending_events: Vec<SessionEvent>,
    pending_effects: Vec<SessionEffect>,
}

impl<T: Transport> PlaybackSession<T> {
    /// Create a stopped session with an empty queue
    ///
    /// `notifier` receives the completions handed to the transport.
    pub fn new(
        transport: T,
        library: Arc<dyn LibraryIndex>,
        config: PlaybackConfig,
        notifier: CompletionNotifier,
    ) -> Self {
        let mut queue = Queue::new();
        queue.toggle_shuffle(config.shuffle);

        Self {
            state: PlaybackState::Stopped,
            queue,
            transport,
            library,
            config,
            generation: Generation::default(),
            notifier,
            lyrics: None,
            ended_while_paused: None,
            pending_events: Vec::new(),
            pending_effects: Vec::new(),
        }
    }

    /// Seed the queue from a saved session (cold start)
    ///
    /// The session stays stopped at the saved track; `play()` resumes there.
    pub fn restore(&mut self, saved: SavedQueue) {
        if self.state.is_active() {
            warn!("Ignoring saved queue, session already active");
            return;
        }
        info!(
            tracks = saved.tracks.len(),
            shuffle = saved.shuffle,
            "Restoring saved queue"
        );
        self.queue.restore(saved);
        self.lyrics = None;
        self.publish();
    }

    // ===== Commands =====

    /// Start or resume playback
    ///
    /// # Errors
    /// `EmptyQueue` when stopped with nothing queued (no-op)
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => {
                let generation = self.generation;
                match self
                    .ended_while_paused
                    .take()
                    .filter(|(ended, _)| *ended == generation)
                {
                    Some((_, outcome)) => self.finish_current(outcome),
                    None => {
                        self.transport.resume();
                        self.set_state(PlaybackState::Playing);
                    }
                }
                self.publish();
                Ok(())
            }
            PlaybackState::Stopped => {
                if self.queue.is_empty() {
                    return Err(PlaybackError::EmptyQueue);
                }
                let result = self.start_current(None);
                self.publish();
                result
            }
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }

        self.transport.pause();
        self.set_state(PlaybackState::Paused);
        if self.config.persist_on_pause {
            self.request_persist();
        }
        self.publish();
    }

    /// Stop playback
    ///
    /// Tells the transport to stop exactly once, whatever the state.
    pub fn stop(&mut self) {
        let was_active = self.state.is_active();
        if was_active {
            self.request_persist();
        }

        self.transport.stop();
        self.generation = self.generation.next();
        self.set_state(PlaybackState::Stopped);

        if was_active {
            self.publish();
        }
    }

    /// Skip to the next track
    ///
    /// At the end of the queue this wraps under the loop policy and does
    /// nothing under the stop policy. Ignored while stopped.
    pub fn skip_to_next(&mut self) -> Result<()> {
        if !self.state.is_active() {
            return Ok(());
        }

        let previous = self.current_id();
        if !self.step_forward() {
            debug!("Skip at end of queue ignored");
            return Ok(());
        }

        let result = self.start_current(previous);
        self.publish();
        result
    }

    /// Go back to the previously played track
    ///
    /// No-op when there is no history. Ignored while stopped.
    pub fn skip_to_previous(&mut self) -> Result<()> {
        if !self.state.is_active() {
            return Ok(());
        }

        let previous = self.current_id();
        if self.queue.retreat().is_none() {
            debug!("No history to go back to");
            return Ok(());
        }

        let result = self.start_current(previous);
        self.publish();
        result
    }

    /// Play a track by id, queueing the rest of its album
    ///
    /// Accepted from every state. The queue becomes the track's album,
    /// starting at the track; a track missing from its album listing plays
    /// on its own.
    ///
    /// # Errors
    /// `TrackNotFound` for unknown ids (state unchanged), `Library` if the
    /// lookup fails
    pub fn play_from_id(&mut self, id: &TrackId) -> Result<()> {
        let track = self
            .library
            .track_by_id(id)?
            .ok_or_else(|| PlaybackError::TrackNotFound(id.to_string()))?;

        let album = self.library.tracks_by_album(&track.album_id)?;
        let (tracks, start) = match album.iter().position(|t| &t.id == id) {
            Some(index) => (album, index),
            None => (vec![track], 0),
        };

        info!(track = %id, queued = tracks.len(), "Playing from id");
        let previous = self.current_id();
        self.queue.set_items(tracks, start)?;

        let result = self.start_current(previous);
        self.publish();
        result
    }

    /// Play `tracks` shuffled, starting at a random one
    ///
    /// # Errors
    /// `EmptyQueue` for an empty list (no-op)
    pub fn shuffle_all(&mut self, tracks: Vec<Track>) -> Result<()> {
        let start = random_start(tracks.len()).ok_or(PlaybackError::EmptyQueue)?;

        info!(queued = tracks.len(), "Shuffling all");
        let previous = self.current_id();
        self.queue.toggle_shuffle(true);
        self.queue.set_items(tracks, start)?;

        let result = self.start_current(previous);
        self.publish();
        result
    }

    /// Turn shuffle on or off for the rest of the queue
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.queue.is_shuffled() == enabled {
            return;
        }
        debug!(enabled, "Shuffle toggled");
        self.queue.toggle_shuffle(enabled);
        self.publish();
    }

    /// Seek within the current track
    ///
    /// Ignored while stopped.
    pub fn seek(&mut self, position_ms: u64) {
        if !self.state.is_active() {
            return;
        }
        self.transport.seek(position_ms);
        self.publish();
    }

    /// Handle a completion reported by the transport
    ///
    /// Completions from a superseded generation are discarded. One that
    /// arrives while paused is kept until playback resumes.
    pub fn transport_done(&mut self, generation: Generation, outcome: TransportOutcome) {
        if generation != self.generation {
            debug!(%generation, current = %self.generation, "Discarding stale completion");
            return;
        }
        match self.state {
            PlaybackState::Playing => {
                self.finish_current(outcome);
                self.publish();
            }
            PlaybackState::Paused => {
                debug!(%generation, "Track ended while paused");
                self.ended_while_paused = Some((generation, outcome));
            }
            PlaybackState::Stopped => {
                debug!("Ignoring completion while stopped");
            }
        }
    }

    /// Attach lyrics read for `track_id`
    ///
    /// Dropped when the track changed in the meantime. Returns whether the
    /// lyrics were attached.
    pub fn attach_lyrics(&mut self, track_id: TrackId, lyrics: String) -> bool {
        if self.current_id().as_ref() != Some(&track_id) {
            debug!(track = %track_id, "Dropping lyrics for a track no longer current");
            return false;
        }

        self.pending_events.push(SessionEvent::LyricsLoaded {
            track_id: track_id.clone(),
            lyrics: lyrics.clone(),
        });
        self.lyrics = Some((track_id, lyrics));
        self.publish();
        true
    }

    /// Save and stop when paused (the last client went away)
    pub fn release_client(&mut self) {
        if self.state == PlaybackState::Paused {
            info!("Client released while paused, stopping");
            self.stop();
        }
    }

    // ===== State Queries =====

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Session configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build a snapshot of the current state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let track = self.queue.current().map(|track| {
            let mut track = track.clone();
            if let Some((id, lyrics)) = &self.lyrics {
                if *id == track.id {
                    track.lyrics = Some(lyrics.clone());
                }
            }
            track
        });

        PlaybackSnapshot {
            state: self.state,
            track,
            position_ms: self.position_ms(),
            songs_left: self.queue.remaining_count(),
            shuffle: self.queue.is_shuffled(),
            upcoming: self.queue.upcoming().into_iter().cloned().collect(),
            generation: self.generation.value(),
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Take all effects requested since the last call
    pub fn drain_effects(&mut self) -> Vec<SessionEffect> {
        std::mem::take(&mut self.pending_effects)
    }

    // ===== Internals =====

    fn current_id(&self) -> Option<TrackId> {
        self.queue.current().map(|t| t.id.clone())
    }

    fn position_ms(&self) -> u64 {
        if self.state.is_active() {
            self.transport.position()
        } else {
            0
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "State transition");
            self.state = state;
            self.pending_events.push(SessionEvent::StateChanged { state });
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.pending_events.push(SessionEvent::Snapshot(snapshot));
    }

    fn request_persist(&mut self) {
        if let Some(track) = self.queue.current() {
            let now_playing =
                NowPlaying::from_track(track, self.position_ms(), self.queue.remaining_count());
            self.pending_effects.push(SessionEffect::Persist {
                queue: self.queue.to_saved(),
                now_playing,
            });
        }
    }

    /// Advance, wrapping under the loop policy
    fn step_forward(&mut self) -> bool {
        if self.queue.advance().is_some() {
            return true;
        }
        self.config.end_of_queue == EndOfQueue::Loop && self.queue.rewind().is_some()
    }

    /// Start the transport on the current track
    ///
    /// A track the transport refuses is skipped like a finished one; after a
    /// full queue of refusals the session stops.
    fn start_current(&mut self, previous: Option<TrackId>) -> Result<()> {
        let mut attempts = self.queue.len();

        loop {
            let track = self
                .queue
                .current()
                .cloned()
                .ok_or(PlaybackError::EmptyQueue)?;

            self.generation = self.generation.next();
            let completion = Completion::new(self.generation, self.notifier.clone());

            match self.transport.start(&track, completion) {
                Ok(()) => {
                    self.set_state(PlaybackState::Playing);
                    self.track_changed(previous, &track);
                    return Ok(());
                }
                Err(err) => {
                    warn!(track = %track.id, error = %err, "Transport refused track");
                    self.pending_events.push(SessionEvent::error(err.to_string()));

                    attempts = attempts.saturating_sub(1);
                    if attempts == 0 || !self.step_forward() {
                        self.stop_at_end();
                        return Err(err);
                    }
                }
            }
        }
    }

    fn track_changed(&mut self, previous: Option<TrackId>, track: &Track) {
        debug!(track = %track.id, generation = %self.generation, "Track started");
        self.lyrics = None;

        self.pending_events.push(SessionEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id: previous,
        });
        self.pending_events
            .push(SessionEvent::MetadataBroadcast(TrackBroadcast::from(track)));

        if self.config.prefetch_lyrics {
            self.pending_effects.push(SessionEffect::FetchLyrics {
                track_id: track.id.clone(),
                path: track.file_path.clone(),
            });
        }
    }

    /// Move past a track the transport is done with
    fn finish_current(&mut self, outcome: TransportOutcome) {
        if let TransportOutcome::Failed(reason) = outcome {
            let err = PlaybackError::TransportFailure(reason);
            warn!(error = %err, "Transport failed, moving on");
            self.pending_events.push(SessionEvent::error(err.to_string()));
        }

        let previous = self.current_id();
        if self.step_forward() {
            // Failures are already reported as events
            let _ = self.start_current(previous);
        } else {
            self.stop_at_end();
        }
    }

    fn stop_at_end(&mut self) {
        info!("Reached end of queue");
        if self.state.is_active() {
            self.request_persist();
        }
        self.transport.stop();
        self.generation = self.generation.next();
        self.set_state(PlaybackState::Stopped);
    }
}
