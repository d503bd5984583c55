//! Threaded controller tests
//!
//! Commands reply only after the worker applied them, so snapshots can be
//! checked right after a call. Transport completions and lyrics arrive
//! asynchronously and are awaited through a subscription.

mod common;

use common::{
    create_large_library, create_library, init_tracing, MapTags, MemoryStore, RecordingTransport,
};
use crossbeam_channel::Receiver;
use platten_core::{LibraryIndex, NowPlaying, SavedQueue, TrackId};
use platten_playback::{
    EndOfQueue, PlaybackConfig, PlaybackError, PlaybackState, SessionController, SessionEvent,
    ROOT_ID,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn wait_for<F>(rx: &Receiver<SessionEvent>, mut predicate: F) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    loop {
        let event = rx.recv_timeout(TIMEOUT).expect("timed out waiting for event");
        if predicate(&event) {
            return event;
        }
    }
}

fn spawn_controller(transport: RecordingTransport) -> SessionController {
    init_tracing();
    SessionController::builder(create_library())
        .spawn(transport)
        .unwrap()
}

fn current_id(controller: &SessionController) -> Option<String> {
    controller.snapshot().track.map(|t| t.id.to_string())
}

#[test]
fn commands_update_latest_snapshot() {
    let transport = RecordingTransport::new();
    let controller = spawn_controller(transport.clone());
    assert_eq!(controller.snapshot().state, PlaybackState::Stopped);

    controller.play_from_id("B").unwrap();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(current_id(&controller).as_deref(), Some("B"));
    assert_eq!(snapshot.songs_left, 1);

    controller.pause().unwrap();
    assert_eq!(controller.snapshot().state, PlaybackState::Paused);

    controller.stop().unwrap();
    assert_eq!(controller.snapshot().state, PlaybackState::Stopped);
    assert_eq!(transport.stops(), 1);
}

#[test]
fn transport_completion_advances() {
    let transport = RecordingTransport::new();
    let controller = spawn_controller(transport.clone());
    let events = controller.subscribe();

    controller.play_from_id("A").unwrap();
    transport.take_completion().finished();

    wait_for(&events, |e| {
        matches!(e, SessionEvent::TrackChanged { track_id, .. } if track_id.as_str() == "B")
    });
    assert_eq!(transport.started(), vec!["A", "B"]);
}

#[test]
fn stale_completion_is_discarded() {
    let transport = RecordingTransport::new();
    let controller = spawn_controller(transport.clone());

    controller.play_from_id("A").unwrap();
    let stale = transport.take_oldest_completion();
    controller.skip_to_next().unwrap();

    stale.finished();
    // Commands queue behind the completion, so this acts as a barrier
    controller.play().unwrap();

    assert_eq!(current_id(&controller).as_deref(), Some("B"));
    assert_eq!(transport.started(), vec!["A", "B"]);
}

#[test]
fn errors_are_returned_and_published() {
    let controller = spawn_controller(RecordingTransport::new());
    let events = controller.subscribe();

    let err = controller.play_from_id("missing").unwrap_err();
    assert_eq!(err, PlaybackError::TrackNotFound("missing".to_string()));

    let event = wait_for(&events, |e| matches!(e, SessionEvent::Error { .. }));
    assert_eq!(event, SessionEvent::error("Track not found: missing"));
    assert_eq!(controller.snapshot().state, PlaybackState::Stopped);

    // No-ops are returned but not published
    assert_eq!(controller.play(), Err(PlaybackError::EmptyQueue));
    assert_eq!(controller.shuffle_all(), Err(PlaybackError::EmptyQueue));
    assert!(events
        .try_iter()
        .all(|event| !matches!(event, SessionEvent::Error { .. })));
}

#[test]
fn pause_and_stop_save_through_writer() {
    init_tracing();
    let store = Arc::new(MemoryStore::default());
    let controller = SessionController::builder(create_library())
        .with_persistence(store.clone())
        .spawn(RecordingTransport::new())
        .unwrap();

    controller.play_from_id("A").unwrap();
    controller.pause().unwrap();
    controller.stop().unwrap();
    controller.shutdown();

    assert_eq!(store.save_count(), 2);
    let (queue, now_playing) = store.last_saved().unwrap();
    assert_eq!(queue.current_index, Some(0));
    assert_eq!(now_playing.track_id, TrackId::new("A"));
    assert_eq!(now_playing.songs_left, 2);
}

#[test]
fn save_failure_is_reported_not_fatal() {
    init_tracing();
    let store = Arc::new(MemoryStore::failing());
    let controller = SessionController::builder(create_library())
        .with_persistence(store)
        .spawn(RecordingTransport::new())
        .unwrap();
    let events = controller.subscribe();

    controller.play_from_id("A").unwrap();
    controller.pause().unwrap();

    let event = wait_for(&events, |e| matches!(e, SessionEvent::Error { .. }));
    assert!(matches!(event, SessionEvent::Error { message } if message.contains("Persistence")));

    // Still usable
    controller.play().unwrap();
    assert_eq!(controller.snapshot().state, PlaybackState::Playing);
}

#[test]
fn cold_start_restores_saved_queue() {
    init_tracing();
    let library = create_library();
    let tracks = library.tracks_by_album(&"abc".into()).unwrap();
    let now_playing = NowPlaying::from_track(&tracks[1], 12_000, 1);
    let saved = SavedQueue {
        tracks,
        current_index: Some(1),
        shuffle: true,
    };

    let transport = RecordingTransport::new();
    let controller = SessionController::builder(library)
        .with_persistence(Arc::new(MemoryStore::with_saved(saved, now_playing)))
        .spawn(transport.clone())
        .unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Stopped);
    assert_eq!(current_id(&controller).as_deref(), Some("B"));
    assert!(snapshot.shuffle);

    controller.play().unwrap();
    assert_eq!(transport.started(), vec!["B"]);
}

#[test]
fn lyrics_are_attached_with_normalized_line_endings() {
    init_tracing();
    let tags = MapTags::with("/music/A.mp3", "first line\rsecond line");
    let controller = SessionController::builder(create_library())
        .with_tags(Arc::new(tags))
        .spawn(RecordingTransport::new())
        .unwrap();
    let events = controller.subscribe();

    controller.play_from_id("A").unwrap();

    let event = wait_for(&events, |e| matches!(e, SessionEvent::LyricsLoaded { .. }));
    assert_eq!(
        event,
        SessionEvent::LyricsLoaded {
            track_id: TrackId::new("A"),
            lyrics: "first line\nsecond line".to_string(),
        }
    );
    wait_for(&events, SessionEvent::is_snapshot);
    assert_eq!(
        controller.snapshot().track.unwrap().lyrics.as_deref(),
        Some("first line\nsecond line")
    );
}

#[test]
fn shuffle_all_uses_last_browsed_album() {
    let controller = spawn_controller(RecordingTransport::new());

    // Nothing browsed yet
    assert_eq!(controller.shuffle_all(), Err(PlaybackError::EmptyQueue));

    let albums = controller.browse(ROOT_ID).unwrap();
    let abc = albums
        .iter()
        .find(|item| item.title == "Three Songs")
        .unwrap();
    assert_eq!(controller.browse(&abc.media_id).unwrap().len(), 3);

    controller.shuffle_all().unwrap();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert!(snapshot.shuffle);
    assert_eq!(snapshot.songs_left, 2);
}

#[test]
fn release_client_saves_and_stops_when_paused() {
    init_tracing();
    let store = Arc::new(MemoryStore::default());
    let transport = RecordingTransport::new();
    let controller = SessionController::builder(create_library())
        .with_persistence(store.clone())
        .with_config(PlaybackConfig {
            persist_on_pause: false,
            ..Default::default()
        })
        .spawn(transport.clone())
        .unwrap();

    controller.play_from_id("C").unwrap();
    controller.release_client().unwrap();
    assert_eq!(controller.snapshot().state, PlaybackState::Playing);

    controller.pause().unwrap();
    controller.release_client().unwrap();
    assert_eq!(controller.snapshot().state, PlaybackState::Stopped);
    controller.shutdown();

    assert_eq!(store.save_count(), 1);
    assert_eq!(transport.stops(), 1);
}

#[test]
fn shutdown_while_playing_stops_once() {
    let transport = RecordingTransport::new();
    let controller = spawn_controller(transport.clone());
    controller.play_from_id("A").unwrap();

    drop(controller);
    assert_eq!(transport.stops(), 1);
}

#[test]
fn concurrent_skips_are_serialized() {
    init_tracing();
    let transport = RecordingTransport::new();
    let controller = Arc::new(
        SessionController::builder(create_large_library(10))
            .with_config(PlaybackConfig {
                end_of_queue: EndOfQueue::Loop,
                prefetch_lyrics: false,
                ..Default::default()
            })
            .spawn(transport.clone())
            .unwrap(),
    );
    controller.play_from_id("T0").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let controller = controller.clone();
            thread::spawn(move || {
                for _ in 0..5 {
                    controller.skip_to_next().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // 20 skips over 10 tracks with looping lands back on the first track
    assert_eq!(transport.started().len(), 21);
    assert_eq!(current_id(&controller).as_deref(), Some("T0"));
}
