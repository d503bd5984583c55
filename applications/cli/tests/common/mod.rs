/// Common test utilities and fixtures
use platten_core::{Album, MemoryLibrary, Track};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Library with one album of three tracks, each `duration` long
pub fn create_library(duration: Duration) -> Arc<MemoryLibrary> {
    let album = Album::new("abc", "Three Songs", "Trio");
    let tracks = ["A", "B", "C"]
        .iter()
        .map(|id| {
            Track::new(*id, format!("Song {}", id), PathBuf::from(format!("/music/{}.mp3", id)))
                .with_duration(duration)
                .on_album(&album)
        })
        .collect();

    Arc::new(MemoryLibrary::new().with_album(album, tracks))
}
