//! Atomic file operations
//!
//! Writes go to a `.tmp` sibling first, are synced, then renamed over the
//! destination. A crash leaves either the old file or the new one, never a
//! partial payload.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically write bytes to a file, creating parent directories as needed
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> AtomicResult<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&temp_path)?;
    file.write_all(content)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Remove leftover `.tmp` files from interrupted writes
///
/// Returns the number of files removed.
pub fn cleanup_temp_files<P: AsRef<Path>>(dir: P) -> AtomicResult<usize> {
    let dir = dir.as_ref();
    let mut cleaned = 0;

    if !dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e == "tmp").unwrap_or(false) {
            fs::remove_file(&path)?;
            cleaned += 1;
        }
    }

    Ok(cleaned)
}
