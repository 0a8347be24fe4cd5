//! Durable key-value stores
//!
//! The persistence gateway only needs three primitives: load a key, save a
//! key, clear a key. `FileStore` backs them with one JSON file per key on
//! disk; `MemoryStore` keeps them in a map for tests and ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use crate::utils::{atomic_write, AtomicError};

/// Result type for persistence operations
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur while reading or writing durable state
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("atomic write failed: {0}")]
    Atomic(#[from] AtomicError),
    #[error("stored state is corrupted: {0}")]
    Corrupted(String),
}

/// Minimal durable key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`, if any
    fn load(&self, key: &str) -> PersistResult<Option<Vec<u8>>>;

    /// Replace the bytes stored under `key`
    fn save(&self, key: &str, bytes: &[u8]) -> PersistResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn clear(&self, key: &str) -> PersistResult<()>;
}

/// Store that keeps each key in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Get the data directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> PersistResult<()> {
        atomic_write(self.path_for(key), bytes)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> PersistResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> PersistResult<()> {
        self.entries.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn clear(&self, key: &str) -> PersistResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> PersistResult<()> {
        (**self).save(key, bytes)
    }

    fn clear(&self, key: &str) -> PersistResult<()> {
        (**self).clear(key)
    }
}
