/// Timing tests for the simulated clock transport
use crossbeam_channel::{unbounded, Receiver};
use platten_core::Track;
use platten_playback::{
    Completion, CompletionNotifier, Generation, PlaybackError, Transport, TransportOutcome,
};
use platten_cli::ClockTransport;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn completion() -> (Completion, Receiver<(Generation, TransportOutcome)>) {
    let (tx, rx) = unbounded();
    let notify: CompletionNotifier = Arc::new(move |generation, outcome| {
        let _ = tx.send((generation, outcome));
    });
    (Completion::new(Generation::default().next(), notify), rx)
}

fn track(duration_ms: u64) -> Track {
    Track::new("t1", "Song", PathBuf::from("/music/t1.mp3"))
        .with_duration(Duration::from_millis(duration_ms))
}

#[test]
fn completion_fires_after_scaled_duration() {
    let mut transport = ClockTransport::new(100.0);
    let (completion, rx) = completion();

    // 5 seconds of track time at 100x is 50ms of wall time
    transport.start(&track(5_000), completion).unwrap();

    let (generation, outcome) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(generation.value(), 1);
    assert_eq!(outcome, TransportOutcome::Finished);
    assert!(transport.position() >= 4_900);
}

#[test]
fn paused_track_does_not_complete() {
    let mut transport = ClockTransport::new(10.0);
    let (completion, rx) = completion();

    transport.start(&track(2_000), completion).unwrap();
    transport.pause();
    thread::sleep(Duration::from_millis(50));
    let held = transport.position();

    assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
    assert_eq!(transport.position(), held);

    transport.resume();
    let (_, outcome) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(outcome, TransportOutcome::Finished);
}

#[test]
fn stopped_track_never_completes() {
    let mut transport = ClockTransport::new(100.0);
    let (completion, rx) = completion();

    transport.start(&track(5_000), completion).unwrap();
    transport.stop();

    assert!(!transport.is_active());
    assert_eq!(transport.position(), 0);
    // The completion handle was dropped with the timer thread
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn seek_moves_playhead() {
    let mut transport = ClockTransport::new(1.0);
    let (completion, _rx) = completion();

    transport.start(&track(600_000), completion).unwrap();
    transport.pause();
    transport.seek(120_000);
    // Control messages are applied by the timer thread
    thread::sleep(Duration::from_millis(50));

    let position = transport.position();
    assert!((120_000..121_000).contains(&position), "position {}", position);
}

#[test]
fn track_without_duration_is_refused() {
    let mut transport = ClockTransport::new(1.0);
    let (completion, _rx) = completion();

    let err = transport.start(&track(0), completion).unwrap_err();
    assert!(matches!(err, PlaybackError::TransportFailure(_)));
    assert!(!transport.is_active());
}
