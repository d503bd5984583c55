//! Shared fakes for the playback integration tests

#![allow(dead_code)]

use platten_core::{
    Album, CoreError, MemoryLibrary, NowPlaying, PersistenceGateway, SavedQueue, TagStore, Track,
    TrackId,
};
use platten_playback::{Completion, CompletionNotifier, Generation, PlaybackError, Transport};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn create_test_track(album: &Album, id: &str) -> Track {
    Track::new(id, format!("Track {}", id), PathBuf::from(format!("/music/{}.mp3", id)))
        .on_album(album)
        .with_duration(Duration::from_secs(180))
}

/// One album "abc" with tracks A, B, C and one album "solo" with track S
pub fn create_library() -> Arc<MemoryLibrary> {
    let abc = Album::new("abc", "Three Songs", "Trio");
    let solo = Album::new("solo", "Single", "Soloist");
    let abc_tracks = ["A", "B", "C"]
        .iter()
        .map(|id| create_test_track(&abc, id))
        .collect();
    let solo_tracks = vec![create_test_track(&solo, "S")];

    Arc::new(
        MemoryLibrary::new()
            .with_album(abc, abc_tracks)
            .with_album(solo, solo_tracks),
    )
}

/// Album with `count` tracks named `T0`, `T1`, ...
pub fn create_large_library(count: usize) -> Arc<MemoryLibrary> {
    let album = Album::new("big", "Box Set", "Various");
    let tracks = (0..count)
        .map(|i| create_test_track(&album, &format!("T{}", i)))
        .collect();
    Arc::new(MemoryLibrary::new().with_album(album, tracks))
}

/// Everything the recording transport saw
#[derive(Default)]
pub struct TransportLog {
    pub started: Vec<TrackId>,
    pub completions: Vec<Completion>,
    pub pauses: usize,
    pub resumes: usize,
    pub stops: usize,
    pub seeks: Vec<u64>,
    pub position_ms: u64,
    pub refuse: Vec<TrackId>,
}

/// Transport that records every call into a shared log
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub log: Arc<Mutex<TransportLog>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .started
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    pub fn stops(&self) -> usize {
        self.log.lock().unwrap().stops
    }

    /// Take the completion handle of the most recent start
    pub fn take_completion(&self) -> Completion {
        self.log
            .lock()
            .unwrap()
            .completions
            .pop()
            .expect("no track started")
    }

    /// Take the completion of the first start still holding one
    pub fn take_oldest_completion(&self) -> Completion {
        self.log.lock().unwrap().completions.remove(0)
    }
}

impl Transport for RecordingTransport {
    fn start(&mut self, track: &Track, completion: Completion) -> platten_playback::Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.refuse.contains(&track.id) {
            return Err(PlaybackError::TransportFailure(format!(
                "cannot open {}",
                track.file_path.display()
            )));
        }
        log.started.push(track.id.clone());
        log.completions.push(completion);
        log.position_ms = 0;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().pauses += 1;
    }

    fn resume(&mut self) {
        self.log.lock().unwrap().resumes += 1;
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().stops += 1;
    }

    fn seek(&mut self, position_ms: u64) {
        let mut log = self.log.lock().unwrap();
        log.seeks.push(position_ms);
        log.position_ms = position_ms;
    }

    fn position(&self) -> u64 {
        self.log.lock().unwrap().position_ms
    }
}

/// Notifier that only records, for driving the session by hand
pub fn recording_notifier() -> (CompletionNotifier, Arc<Mutex<Vec<Generation>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let notifier: CompletionNotifier = Arc::new(move |generation, _outcome| {
        sink.lock().unwrap().push(generation);
    });
    (notifier, seen)
}

/// In-memory persistence gateway
#[derive(Default)]
pub struct MemoryStore {
    pub saved: Mutex<Vec<(SavedQueue, NowPlaying)>>,
    pub initial: Mutex<Option<(SavedQueue, NowPlaying)>>,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn with_saved(queue: SavedQueue, now_playing: NowPlaying) -> Self {
        Self {
            initial: Mutex::new(Some((queue, now_playing))),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Default::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<(SavedQueue, NowPlaying)> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl PersistenceGateway for MemoryStore {
    fn save(&self, queue: &SavedQueue, now_playing: &NowPlaying) -> platten_core::Result<()> {
        if self.fail_saves {
            return Err(CoreError::persistence("disk full"));
        }
        self.saved
            .lock()
            .unwrap()
            .push((queue.clone(), now_playing.clone()));
        Ok(())
    }

    fn load(&self) -> platten_core::Result<Option<(SavedQueue, NowPlaying)>> {
        Ok(self.initial.lock().unwrap().clone())
    }
}

/// Tag store serving lyrics from a map keyed by file path
#[derive(Default)]
pub struct MapTags {
    pub lyrics: HashMap<PathBuf, String>,
}

impl MapTags {
    pub fn with(path: &str, lyrics: &str) -> Self {
        let mut tags = Self::default();
        tags.lyrics.insert(PathBuf::from(path), lyrics.to_string());
        tags
    }
}

impl TagStore for MapTags {
    fn lyrics(&self, path: &Path) -> platten_core::Result<Option<String>> {
        Ok(self.lyrics.get(path).cloned())
    }
}
