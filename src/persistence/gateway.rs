//! Persistence gateway
//!
//! Mirrors the match state into a key-value store under a single key.
//! An absent key and the empty, not-started state are interchangeable:
//! saving the empty state deletes the key, loading an absent key yields
//! the empty state.

use tracing::debug;

use crate::types::MatchState;

use super::store::{KeyValueStore, PersistError, PersistResult};

/// Default key the match state is stored under
pub const DEFAULT_STORAGE_KEY: &str = "padel-match-state";

/// Serialize a state to the stored payload
pub fn encode_state(state: &MatchState) -> PersistResult<Vec<u8>> {
    Ok(serde_json::to_vec(state)?)
}

/// Deserialize a stored payload without re-validating it
pub fn decode_state(bytes: &[u8]) -> PersistResult<MatchState> {
    serde_json::from_slice(bytes).map_err(|e| PersistError::Corrupted(e.to_string()))
}

/// Reads and writes the match state through a store
pub struct PersistenceGateway<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Create a gateway using the default storage key
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Create a gateway using a custom storage key
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the state, or clear the key if the match has not started
    pub fn save(&self, state: &MatchState) -> PersistResult<()> {
        if !state.started {
            debug!(key = %self.key, "clearing stored state");
            return self.store.clear(&self.key);
        }

        let bytes = encode_state(state)?;
        debug!(key = %self.key, bytes = bytes.len(), events = state.event_count(), "saving state");
        self.store.save(&self.key, &bytes)
    }

    /// Read the stored state; an absent key yields the empty state
    pub fn load(&self) -> PersistResult<MatchState> {
        match self.store.load(&self.key)? {
            Some(bytes) => decode_state(&bytes),
            None => Ok(MatchState::new()),
        }
    }

    /// Remove the stored state
    pub fn clear(&self) -> PersistResult<()> {
        self.store.clear(&self.key)
    }

    /// Check whether anything is stored under the key
    pub fn has_saved_state(&self) -> PersistResult<bool> {
        Ok(self.store.load(&self.key)?.is_some())
    }
}
