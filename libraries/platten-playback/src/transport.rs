//! Audio engine abstraction
//!
//! The session never decodes audio itself. Platforms implement [`Transport`]
//! for their audio engine and report the end of each track through the
//! [`Completion`] handle they received in `start`.

use crate::error::Result;
use platten_core::Track;
use std::fmt;
use std::sync::Arc;

/// Playback generation
///
/// Incremented every time the session starts or stops the transport. A
/// completion carrying an older generation belongs to a superseded track and
/// is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// The generation following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// How a started track ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// Played to the end
    Finished,

    /// The engine gave up on the track
    Failed(String),
}

/// Receiver of completion notifications
pub type CompletionNotifier = Arc<dyn Fn(Generation, TransportOutcome) + Send + Sync>;

/// One-shot completion handle for a started track
///
/// Consumed on use, so each `start` can report completion at most once.
pub struct Completion {
    generation: Generation,
    notify: CompletionNotifier,
}

impl Completion {
    /// Create a handle that reports to `notify`
    pub fn new(generation: Generation, notify: CompletionNotifier) -> Self {
        Self { generation, notify }
    }

    /// Generation of the track this handle belongs to
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Report that the track played to the end
    pub fn finished(self) {
        (self.notify)(self.generation, TransportOutcome::Finished);
    }

    /// Report that the engine failed to play the track
    pub fn failed(self, reason: impl Into<String>) {
        (self.notify)(self.generation, TransportOutcome::Failed(reason.into()));
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Audio engine driven by the session
///
/// The session is the sole owner of the transport lifecycle: it calls
/// `start` for every track change and `stop` exactly once per stop command.
pub trait Transport: Send {
    /// Start playing `track` from the beginning
    ///
    /// # Errors
    /// Returns `TransportFailure` if the track cannot be opened; the session
    /// then moves on as if the track had finished.
    fn start(&mut self, track: &Track, completion: Completion) -> Result<()>;

    /// Pause output, keeping the position
    fn pause(&mut self);

    /// Resume after `pause`
    fn resume(&mut self);

    /// Stop output and drop the current track
    fn stop(&mut self);

    /// Jump to `position_ms` within the current track
    fn seek(&mut self, position_ms: u64);

    /// Elapsed position of the current track in milliseconds
    fn position(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn generations_increase() {
        let first = Generation::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "gen#1");
    }

    #[test]
    fn completion_reports_generation_and_outcome() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let notify: CompletionNotifier = Arc::new(move |generation, outcome| {
            sink.lock().unwrap().push((generation, outcome));
        });

        let generation = Generation::default().next().next();
        Completion::new(generation, notify.clone()).finished();
        Completion::new(generation, notify).failed("decoder error");

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0], (generation, TransportOutcome::Finished));
        assert_eq!(
            received[1],
            (generation, TransportOutcome::Failed("decoder error".to_string()))
        );
    }
}
