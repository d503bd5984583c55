//! Threaded session controller
//!
//! Serializes commands from any thread onto one worker that owns the
//! [`PlaybackSession`]. Transport completions and loaded lyrics come back
//! through the same channel, so transitions apply one at a time in receive
//! order. Saves run on a writer thread and lyrics reads on a helper thread;
//! neither ever blocks the worker.

use crate::{
    browse::MediaBrowser,
    error::{PlaybackError, Result},
    events::{PlaybackSnapshot, SessionEvent},
    session::{PlaybackSession, SessionEffect},
    transport::{CompletionNotifier, Generation, Transport, TransportOutcome},
    types::PlaybackConfig,
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use platten_core::{
    LibraryIndex, MediaItem, NowPlaying, PersistenceGateway, SavedQueue, TagStore, TrackId,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Session-specific commands beyond the transport controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomCommand {
    /// Turn shuffle on or off
    Shuffle(bool),

    /// Play the last browsed album listing shuffled
    ShuffleAll,
}

/// Commands accepted by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start or resume playback
    Play,

    /// Pause playback
    Pause,

    /// Stop playback
    Stop,

    /// Skip to next track
    SkipToNext,

    /// Go to previous track
    SkipToPrevious,

    /// Play a track (and its album) by id
    PlayFromId(TrackId),

    /// Seek to position (in milliseconds)
    Seek(u64),

    /// Custom command
    Custom(CustomCommand),

    /// The last client went away
    ReleaseClient,
}

/// Messages handled by the worker
enum Message {
    Command(SessionCommand, Sender<Result<()>>),
    TransportDone {
        generation: Generation,
        outcome: TransportOutcome,
    },
    LyricsLoaded {
        track_id: TrackId,
        lyrics: String,
    },
    Shutdown,
}

/// Events buffered per subscriber before new ones are dropped
pub const SUBSCRIBER_CAPACITY: usize = 1024;

/// Event fan-out to subscribers
#[derive(Clone, Default)]
struct Subscribers(Arc<Mutex<Vec<Sender<SessionEvent>>>>);

impl Subscribers {
    fn add(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = bounded(SUBSCRIBER_CAPACITY);
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(tx);
        rx
    }

    /// Never blocks; a subscriber that stopped reading misses events
    fn publish(&self, event: &SessionEvent) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| match tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    debug!("Subscriber lagging, event dropped");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }
}

/// Builder for [`SessionController`]
pub struct ControllerBuilder {
    library: Arc<dyn LibraryIndex>,
    persistence: Option<Arc<dyn PersistenceGateway>>,
    tags: Option<Arc<dyn TagStore>>,
    config: PlaybackConfig,
}

impl ControllerBuilder {
    /// Save and restore the queue through `gateway`
    #[must_use]
    pub fn with_persistence(mut self, gateway: Arc<dyn PersistenceGateway>) -> Self {
        self.persistence = Some(gateway);
        self
    }

    /// Read lyrics through `tags`
    #[must_use]
    pub fn with_tags(mut self, tags: Arc<dyn TagStore>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Use `config` instead of the defaults
    #[must_use]
    pub fn with_config(mut self, config: PlaybackConfig) -> Self {
        self.config = config;
        self
    }

    /// Restore the saved queue and start the session threads
    ///
    /// # Errors
    /// `Worker` if a thread cannot be spawned
    pub fn spawn<T: Transport + 'static>(self, transport: T) -> Result<SessionController> {
        let (tx, rx) = unbounded::<Message>();

        let notify_tx = tx.clone();
        let notifier: CompletionNotifier = Arc::new(move |generation, outcome| {
            // The worker may already be gone at shutdown
            let _ = notify_tx.send(Message::TransportDone {
                generation,
                outcome,
            });
        });

        let mut session =
            PlaybackSession::new(transport, self.library.clone(), self.config, notifier);
        let subscribers = Subscribers::default();

        if let Some(gateway) = &self.persistence {
            match gateway.load() {
                Ok(Some((saved, now_playing))) => {
                    info!(track = %now_playing.track_id, "Resuming saved session");
                    session.restore(saved);
                }
                Ok(None) => debug!("No saved session"),
                Err(err) => {
                    let err = PlaybackError::from(err);
                    warn!(error = %err, "Could not load saved session");
                }
            }
        }

        let latest = Arc::new(Mutex::new(session.snapshot()));
        session.drain_events();

        let mut handles = Vec::new();

        let (save_tx, save_rx) = unbounded::<(SavedQueue, NowPlaying)>();
        if let Some(gateway) = self.persistence {
            let subscribers = subscribers.clone();
            handles.push(spawn_named("platten-writer", move || {
                run_writer(gateway.as_ref(), &save_rx, &subscribers);
            })?);
        }

        let (lyrics_tx, lyrics_rx) = unbounded::<(TrackId, PathBuf)>();
        if let Some(tags) = self.tags {
            let reply = tx.clone();
            handles.push(spawn_named("platten-lyrics", move || {
                run_lyrics(tags.as_ref(), &lyrics_rx, &reply);
            })?);
        }

        let worker = Worker {
            session,
            browser: MediaBrowser::new(self.library.clone()),
            latest: latest.clone(),
            subscribers: subscribers.clone(),
            save_tx,
            lyrics_tx,
        };
        let browser = worker.browser.clone();
        // The worker goes first so joining it closes the writer and lyrics
        // channels before those threads are joined
        handles.insert(0, spawn_named("platten-session", move || worker.run(&rx))?);

        info!("Session controller started");
        Ok(SessionController {
            tx,
            latest,
            subscribers,
            browser,
            handles,
        })
    }
}

/// Handle to a running playback session
///
/// Dropping the controller shuts the session down.
pub struct SessionController {
    tx: Sender<Message>,
    latest: Arc<Mutex<PlaybackSnapshot>>,
    subscribers: Subscribers,
    browser: MediaBrowser,
    handles: Vec<JoinHandle<()>>,
}

impl SessionController {
    /// Start building a controller over `library`
    pub fn builder(library: Arc<dyn LibraryIndex>) -> ControllerBuilder {
        ControllerBuilder {
            library,
            persistence: None,
            tags: None,
            config: PlaybackConfig::default(),
        }
    }

    /// Send a command and wait until it has been applied
    ///
    /// Errors other than no-ops are also published as `SessionEvent::Error`.
    ///
    /// # Errors
    /// The command's own error, or `ChannelClosed` after shutdown
    pub fn send(&self, command: SessionCommand) -> Result<()> {
        let (reply_tx, reply_rx) = bounded(1);
        self.tx.send(Message::Command(command, reply_tx))?;
        reply_rx.recv().map_err(|_| PlaybackError::ChannelClosed)?
    }

    /// Start or resume playback
    pub fn play(&self) -> Result<()> {
        self.send(SessionCommand::Play)
    }

    /// Pause playback
    pub fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause)
    }

    /// Stop playback
    pub fn stop(&self) -> Result<()> {
        self.send(SessionCommand::Stop)
    }

    /// Skip to next track
    pub fn skip_to_next(&self) -> Result<()> {
        self.send(SessionCommand::SkipToNext)
    }

    /// Go to previous track
    pub fn skip_to_previous(&self) -> Result<()> {
        self.send(SessionCommand::SkipToPrevious)
    }

    /// Play a track by id
    pub fn play_from_id(&self, id: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::PlayFromId(TrackId::new(id)))
    }

    /// Seek within the current track
    pub fn seek(&self, position_ms: u64) -> Result<()> {
        self.send(SessionCommand::Seek(position_ms))
    }

    /// Turn shuffle on or off
    pub fn set_shuffle(&self, enabled: bool) -> Result<()> {
        self.send(SessionCommand::Custom(CustomCommand::Shuffle(enabled)))
    }

    /// Play the last browsed album shuffled
    pub fn shuffle_all(&self) -> Result<()> {
        self.send(SessionCommand::Custom(CustomCommand::ShuffleAll))
    }

    /// Save and stop if paused
    pub fn release_client(&self) -> Result<()> {
        self.send(SessionCommand::ReleaseClient)
    }

    /// Browse the library; album listings feed `shuffle_all`
    pub fn browse(&self, parent_id: &str) -> Result<Vec<MediaItem>> {
        self.browser.children(parent_id)
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.subscribers.add()
    }

    /// Most recent snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stop the session and wait for pending saves
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        // Already gone if the worker died
        let _ = self.tx.send(Message::Shutdown);
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("Session thread panicked");
            }
        }
        info!("Session controller stopped");
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.close();
    }
}

/// State owned by the worker thread
struct Worker<T: Transport> {
    session: PlaybackSession<T>,
    browser: MediaBrowser,
    latest: Arc<Mutex<PlaybackSnapshot>>,
    subscribers: Subscribers,
    save_tx: Sender<(SavedQueue, NowPlaying)>,
    lyrics_tx: Sender<(TrackId, PathBuf)>,
}

impl<T: Transport> Worker<T> {
    fn run(mut self, rx: &Receiver<Message>) {
        for message in rx.iter() {
            match message {
                Message::Command(command, reply) => {
                    let result = self.apply(command);
                    match &result {
                        Err(err) if err.is_noop() => {
                            debug!(error = %err, "Command had no effect");
                        }
                        Err(err) => {
                            warn!(error = %err, "Command failed");
                            self.session
                                .drain_events()
                                .into_iter()
                                .for_each(|event| self.publish(event));
                            self.publish(SessionEvent::error(err.to_string()));
                        }
                        Ok(()) => {}
                    }
                    self.dispatch();
                    // The caller may have given up waiting
                    let _ = reply.send(result);
                }
                Message::TransportDone {
                    generation,
                    outcome,
                } => {
                    self.session.transport_done(generation, outcome);
                    self.dispatch();
                }
                Message::LyricsLoaded { track_id, lyrics } => {
                    self.session.attach_lyrics(track_id, lyrics);
                    self.dispatch();
                }
                Message::Shutdown => {
                    if self.session.state().is_active() {
                        self.session.stop();
                        self.dispatch();
                    }
                    break;
                }
            }
        }
        debug!("Session worker exiting");
    }

    fn apply(&mut self, command: SessionCommand) -> Result<()> {
        debug!(?command, "Applying command");
        match command {
            SessionCommand::Play => self.session.play(),
            SessionCommand::Pause => {
                self.session.pause();
                Ok(())
            }
            SessionCommand::Stop => {
                self.session.stop();
                Ok(())
            }
            SessionCommand::SkipToNext => self.session.skip_to_next(),
            SessionCommand::SkipToPrevious => self.session.skip_to_previous(),
            SessionCommand::PlayFromId(id) => self.session.play_from_id(&id),
            SessionCommand::Seek(position_ms) => {
                self.session.seek(position_ms);
                Ok(())
            }
            SessionCommand::Custom(CustomCommand::Shuffle(enabled)) => {
                self.session.set_shuffle(enabled);
                Ok(())
            }
            SessionCommand::Custom(CustomCommand::ShuffleAll) => {
                self.session.shuffle_all(self.browser.last_listing())
            }
            SessionCommand::ReleaseClient => {
                self.session.release_client();
                Ok(())
            }
        }
    }

    /// Hand effects to the helper threads and events to subscribers
    fn dispatch(&mut self) {
        for effect in self.session.drain_effects() {
            match effect {
                SessionEffect::Persist { queue, now_playing } => {
                    if self.save_tx.send((queue, now_playing)).is_err() {
                        debug!("No persistence configured, save skipped");
                    }
                }
                SessionEffect::FetchLyrics { track_id, path } => {
                    if self.lyrics_tx.send((track_id, path)).is_err() {
                        debug!("No tag store configured, lyrics skipped");
                    }
                }
            }
        }

        for event in self.session.drain_events() {
            self.publish(event);
        }
    }

    fn publish(&self, event: SessionEvent) {
        if let SessionEvent::Snapshot(snapshot) = &event {
            *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        }
        self.subscribers.publish(&event);
    }
}

fn spawn_named<F>(name: &str, f: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(|e| PlaybackError::Worker(e.to_string()))
}

fn run_writer(
    gateway: &dyn PersistenceGateway,
    rx: &Receiver<(SavedQueue, NowPlaying)>,
    subscribers: &Subscribers,
) {
    for (queue, now_playing) in rx.iter() {
        match gateway.save(&queue, &now_playing) {
            Ok(()) => debug!(track = %now_playing.track_id, "Session saved"),
            Err(err) => {
                let err = PlaybackError::PersistenceFailure(err.to_string());
                warn!(error = %err, "Could not save session");
                subscribers.publish(&SessionEvent::error(err.to_string()));
            }
        }
    }
}

fn run_lyrics(tags: &dyn TagStore, rx: &Receiver<(TrackId, PathBuf)>, reply: &Sender<Message>) {
    for (track_id, path) in rx.iter() {
        match tags.lyrics(&path) {
            Ok(Some(text)) => {
                let message = Message::LyricsLoaded {
                    track_id,
                    lyrics: normalize_lyrics(&text),
                };
                if reply.send(message).is_err() {
                    break;
                }
            }
            Ok(None) => debug!(track = %track_id, "No lyrics"),
            Err(err) => debug!(track = %track_id, error = %err, "Could not read lyrics"),
        }
    }
}

/// Turn carriage returns (alone or before a newline) into newlines
pub fn normalize_lyrics(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
