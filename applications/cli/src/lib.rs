//! Platten CLI Library
//!
//! A line-driven player over a scanned music directory, driving the
//! playback session with a simulated clock instead of audio output.
//!
//! This library exposes the core components for testing purposes.

pub mod clock_transport;
pub mod config;
pub mod error;
pub mod repl;

// Re-export commonly used types for convenience
pub use clock_transport::ClockTransport;
pub use config::PlayerConfig;
pub use error::{CliError, Result};
pub use repl::{Repl, ReplCommand};
