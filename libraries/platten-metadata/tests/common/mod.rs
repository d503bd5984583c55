//! Shared fixtures for the metadata tests

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write a minimal silent PCM WAV file (44.1kHz, stereo) without tags
pub fn create_test_wav(path: &Path, duration_ms: u32) -> std::io::Result<()> {
    let sample_rate = 44100u32;
    let channels = 2u16;
    let num_samples = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;

    let byte_rate = sample_rate * channels as u32 * 2;
    let block_align = channels * 2;
    let data_size = (num_samples * channels as usize * 2) as u32;
    let chunk_size = 36 + data_size;

    // RIFF header
    file.write_all(b"RIFF")?;
    file.write_all(&chunk_size.to_le_bytes())?;
    file.write_all(b"WAVE")?;

    // fmt chunk
    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&channels.to_le_bytes())?;
    file.write_all(&sample_rate.to_le_bytes())?;
    file.write_all(&byte_rate.to_le_bytes())?;
    file.write_all(&block_align.to_le_bytes())?;
    file.write_all(&16u16.to_le_bytes())?;

    // data chunk
    file.write_all(b"data")?;
    file.write_all(&data_size.to_le_bytes())?;
    file.write_all(&vec![0u8; data_size as usize])?;

    Ok(())
}

/// Write a file that is not audio at all
pub fn create_garbage(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"Not a valid audio file")
}
