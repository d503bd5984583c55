/// Line-driven command loop over a session controller
use crate::error::{CliError, Result};
use platten_core::MediaItemKind;
use platten_playback::{PlaybackError, PlaybackSnapshot, SessionController, ROOT_ID};
use std::io::{BufRead, Write};
use std::str::FromStr;

const HELP: &str = "\
commands:
  play [id]        resume, or play the track with this id
  pause            pause playback
  stop             stop playback and save the queue
  next | prev      skip forward / back
  seek <m:ss|s>    jump within the current track
  shuffle on|off   toggle shuffle
  shuffle-all      shuffle the last browsed album
  browse [id]      list albums, or the tracks of an album
  status           show what is playing
  queue            show the upcoming tracks
  release          let go of a paused session
  quit             exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Play(Option<String>),
    Pause,
    Stop,
    Next,
    Previous,
    Seek(u64),
    Shuffle(bool),
    ShuffleAll,
    Browse(Option<String>),
    Status,
    Queue,
    Release,
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };

        let command = match (word.to_lowercase().as_str(), rest) {
            ("play", id) => Self::Play(id.map(str::to_string)),
            ("pause", None) => Self::Pause,
            ("stop", None) => Self::Stop,
            ("next" | "skip", None) => Self::Next,
            ("prev" | "previous", None) => Self::Previous,
            ("seek", Some(position)) => Self::Seek(parse_position(position)?),
            ("shuffle", Some("on")) => Self::Shuffle(true),
            ("shuffle", Some("off")) => Self::Shuffle(false),
            ("shuffle-all", None) => Self::ShuffleAll,
            ("browse" | "ls", parent) => Self::Browse(parent.map(str::to_string)),
            ("status", None) => Self::Status,
            ("queue", None) => Self::Queue,
            ("release", None) => Self::Release,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            _ => return Err(CliError::InvalidCommand(line.to_string())),
        };
        Ok(command)
    }
}

/// Parse "90" (seconds) or "1:30" into milliseconds
fn parse_position(text: &str) -> Result<u64> {
    let invalid = || CliError::InvalidCommand(format!("seek {}", text));

    let seconds = match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
            if seconds >= 60 {
                return Err(invalid());
            }
            minutes * 60 + seconds
        }
        None => text.parse().map_err(|_| invalid())?,
    };
    Ok(seconds * 1000)
}

fn format_time(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Interactive front end
pub struct Repl<'a> {
    controller: &'a SessionController,
}

impl<'a> Repl<'a> {
    pub fn new(controller: &'a SessionController) -> Self {
        Self { controller }
    }

    /// Read commands until `quit` or end of input
    ///
    /// Command failures are printed and the loop goes on; only I/O errors
    /// end it early.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<ReplCommand>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{} (try `help`)", e)?;
                    continue;
                }
            };

            match self.execute(&command, out) {
                Ok(true) => {}
                Ok(false) => break,
                Err(CliError::Playback(e)) => report(&e, out)?,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Run one command; returns `false` when the loop should end
    pub fn execute<W: Write>(&self, command: &ReplCommand, out: &mut W) -> Result<bool> {
        let controller = self.controller;
        match command {
            ReplCommand::Play(None) => controller.play()?,
            ReplCommand::Play(Some(id)) => controller.play_from_id(id.as_str())?,
            ReplCommand::Pause => controller.pause()?,
            ReplCommand::Stop => controller.stop()?,
            ReplCommand::Next => controller.skip_to_next()?,
            ReplCommand::Previous => controller.skip_to_previous()?,
            ReplCommand::Seek(position_ms) => controller.seek(*position_ms)?,
            ReplCommand::Shuffle(enabled) => controller.set_shuffle(*enabled)?,
            ReplCommand::ShuffleAll => controller.shuffle_all()?,
            ReplCommand::Release => controller.release_client()?,
            ReplCommand::Browse(parent) => {
                let parent = parent.as_deref().unwrap_or(ROOT_ID);
                for item in controller.browse(parent)? {
                    let kind = match item.kind {
                        MediaItemKind::Browsable => "album",
                        MediaItemKind::Playable => "track",
                    };
                    writeln!(
                        out,
                        "[{}] {}  {} - {}",
                        kind, item.media_id, item.title, item.subtitle
                    )?;
                }
                return Ok(true);
            }
            ReplCommand::Status => {
                write_status(&controller.snapshot(), out)?;
                return Ok(true);
            }
            ReplCommand::Queue => {
                let snapshot = controller.snapshot();
                if snapshot.upcoming.is_empty() {
                    writeln!(out, "queue is empty")?;
                }
                for (n, track) in snapshot.upcoming.iter().enumerate() {
                    writeln!(out, "{:>3}. {} - {}", n + 1, track.title, track.artist)?;
                }
                return Ok(true);
            }
            ReplCommand::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(true);
            }
            ReplCommand::Quit => return Ok(false),
        }

        writeln!(out, "{}", controller.snapshot().state)?;
        Ok(true)
    }
}

fn report<W: Write>(err: &PlaybackError, out: &mut W) -> Result<()> {
    if err.is_noop() {
        writeln!(out, "nothing to play")?;
    } else {
        writeln!(out, "error: {}", err)?;
    }
    Ok(())
}

fn write_status<W: Write>(snapshot: &PlaybackSnapshot, out: &mut W) -> Result<()> {
    writeln!(out, "state: {}", snapshot.state)?;
    if let Some(track) = &snapshot.track {
        writeln!(
            out,
            "track: {} - {} ({}) [{}]",
            track.title, track.artist, track.album, track.id
        )?;
        writeln!(
            out,
            "position: {} / {}",
            format_time(snapshot.position_ms),
            format_time(track.duration_ms)
        )?;
        writeln!(out, "songs left: {}", snapshot.songs_left)?;
    }
    writeln!(out, "shuffle: {}", if snapshot.shuffle { "on" } else { "off" })?;
    Ok(())
}
