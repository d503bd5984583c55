//! Simulated Clock Transport
//!
//! Plays nothing; a timer thread per track tracks the playhead and fires
//! the completion when the track's duration has elapsed. The speed factor
//! compresses time so a library can be walked through quickly.
//!
//! ## Architecture
//!
//! ```text
//! Session Worker                 Timer Thread
//!        │                              │
//!        │  start(track, completion)    │
//!        │─────────────────────────────>│ spawned, playhead running
//!        │  pause / resume / seek       │
//!        │─────────────────────────────>│ recv_timeout(remaining)
//!        │                              │
//!        │  completion.finished()       │ timeout hit
//!        │<─────────────────────────────│
//! ```

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use platten_core::Track;
use platten_playback::{Completion, PlaybackError, Transport};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Control messages for the timer thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Seek(u64),
    Stop,
}

/// Track position in track time, advancing at `speed` while running
#[derive(Debug)]
struct Playhead {
    base_ms: u64,
    running_since: Option<Instant>,
    speed: f64,
}

impl Playhead {
    fn new(speed: f64) -> Self {
        Self {
            base_ms: 0,
            running_since: Some(Instant::now()),
            speed,
        }
    }

    fn position_ms(&self) -> u64 {
        let running = self
            .running_since
            .map(|since| (since.elapsed().as_secs_f64() * 1000.0 * self.speed) as u64)
            .unwrap_or(0);
        self.base_ms + running
    }

    fn pause(&mut self) {
        self.base_ms = self.position_ms();
        self.running_since = None;
    }

    fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn seek(&mut self, position_ms: u64) {
        self.base_ms = position_ms;
        if self.running_since.is_some() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Wall-clock time until `duration_ms` is reached, `None` while paused
    fn remaining(&self, duration_ms: u64) -> Option<Duration> {
        self.running_since?;
        let left_ms = duration_ms.saturating_sub(self.position_ms());
        Some(Duration::from_secs_f64(left_ms as f64 / 1000.0 / self.speed))
    }
}

/// The track currently held by the transport
struct Active {
    control: Sender<Control>,
    playhead: Arc<Mutex<Playhead>>,
    handle: JoinHandle<()>,
}

/// Transport driven by a simulated clock
pub struct ClockTransport {
    speed: f64,
    active: Option<Active>,
}

impl ClockTransport {
    /// Create a transport running `speed` times faster than real time
    ///
    /// Speeds that are not positive fall back to real time.
    pub fn new(speed: f64) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        Self {
            speed,
            active: None,
        }
    }

    /// Speed factor
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether a track is held (playing or paused)
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn send(&self, control: Control) {
        if let Some(active) = &self.active {
            // The timer thread is gone once the track finished
            let _ = active.control.send(control);
        }
    }

    fn timer_thread(
        duration_ms: u64,
        control: Receiver<Control>,
        playhead: Arc<Mutex<Playhead>>,
        completion: Completion,
    ) {
        loop {
            let remaining = playhead
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remaining(duration_ms);

            let message = match remaining {
                Some(timeout) => control.recv_timeout(timeout),
                None => control.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            let mut head = playhead.lock().unwrap_or_else(PoisonError::into_inner);
            match message {
                Ok(Control::Pause) => head.pause(),
                Ok(Control::Resume) => head.resume(),
                Ok(Control::Seek(position_ms)) => head.seek(position_ms.min(duration_ms)),
                Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => return,
                Err(RecvTimeoutError::Timeout) => {
                    head.pause();
                    drop(head);
                    debug!(generation = %completion.generation(), "Clock reached end of track");
                    completion.finished();
                    return;
                }
            }
        }
    }
}

impl Transport for ClockTransport {
    fn start(&mut self, track: &Track, completion: Completion) -> platten_playback::Result<()> {
        self.stop();

        if track.duration_ms == 0 {
            return Err(PlaybackError::TransportFailure(format!(
                "{} has no known duration",
                track.id
            )));
        }

        let (control_tx, control_rx) = unbounded();
        let playhead = Arc::new(Mutex::new(Playhead::new(self.speed)));
        let thread_playhead = playhead.clone();
        let duration_ms = track.duration_ms;

        let handle = thread::Builder::new()
            .name("platten-clock".to_string())
            .spawn(move || {
                Self::timer_thread(duration_ms, control_rx, thread_playhead, completion);
            })
            .map_err(|e| PlaybackError::TransportFailure(e.to_string()))?;

        debug!(track = %track.id, duration_ms, speed = self.speed, "Clock started");
        self.active = Some(Active {
            control: control_tx,
            playhead,
            handle,
        });
        Ok(())
    }

    fn pause(&mut self) {
        self.send(Control::Pause);
    }

    fn resume(&mut self) {
        self.send(Control::Resume);
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.control.send(Control::Stop);
            if active.handle.join().is_err() {
                warn!("Clock thread panicked");
            }
        }
    }

    fn seek(&mut self, position_ms: u64) {
        self.send(Control::Seek(position_ms));
    }

    fn position(&self) -> u64 {
        self.active
            .as_ref()
            .map(|active| {
                active
                    .playhead
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .position_ms()
            })
            .unwrap_or(0)
    }
}

impl Drop for ClockTransport {
    fn drop(&mut self) {
        self.stop();
    }
}
