//! JSON file implementation of the session gateway

use crate::error::{Result, StorageError};
use platten_core::{NowPlaying, PersistenceGateway, SavedQueue};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current layout of the state file
const RECORD_VERSION: u32 = 1;

/// The document stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Layout version
    pub version: u32,
    /// Saved queue
    pub queue: SavedQueue,
    /// Metadata of the track that was current
    pub now_playing: NowPlaying,
}

impl SessionRecord {
    /// Wrap a queue and its metadata in the current layout
    pub fn new(queue: SavedQueue, now_playing: NowPlaying) -> Self {
        Self {
            version: RECORD_VERSION,
            queue,
            now_playing,
        }
    }
}

/// Session store backed by a single JSON file
///
/// Every save writes a sibling temp file and renames it over the target, so
/// a reader sees either the previous record or the new one.
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    /// Create a store for the file at `path` (created on first save)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `record`, replacing any previous one
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written
    pub fn write(&self, record: &SessionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(record)?;
        let temp_path = self.temp_path();

        let mut file = File::create(&temp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(
            path = %self.path.display(),
            tracks = record.queue.tracks.len(),
            "Session saved"
        );
        Ok(())
    }

    /// Read the stored record
    ///
    /// A missing file is not an error and yields `None`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded
    pub fn read(&self) -> Result<Option<SessionRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: SessionRecord = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::corrupt(self.path.display().to_string(), e.to_string()))?;

        if record.version != RECORD_VERSION {
            warn!(
                path = %self.path.display(),
                version = record.version,
                "Session file has an unknown layout version"
            );
        }

        Ok(Some(record))
    }

    /// Remove the stored record
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be removed
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PersistenceGateway for JsonSessionStore {
    fn save(&self, queue: &SavedQueue, now_playing: &NowPlaying) -> platten_core::Result<()> {
        let record = SessionRecord::new(queue.clone(), now_playing.clone());
        Ok(self.write(&record)?)
    }

    fn load(&self) -> platten_core::Result<Option<(SavedQueue, NowPlaying)>> {
        Ok(self
            .read()?
            .map(|record| (record.queue, record.now_playing)))
    }
}
