//! Export and import of portable match files
//!
//! Export wraps the state in a versioned envelope. Import checks the decoded
//! payload's shape before anything touches the caller's state, so a bad file
//! can never half-apply.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{MatchState, SCHEMA_VERSION};
use crate::utils::{atomic_write, iso_date};

use super::store::PersistResult;

/// Errors raised while importing a match file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The bytes decoded but do not describe a match
    #[error("invalid match file: {0}")]
    InvalidFormat(String),
    /// The bytes are not a readable payload
    #[error("could not parse match file: {0}")]
    ParseFailure(String),
}

/// Top-level shape of an export file
///
/// Write-only: import reads the decoded JSON directly, since older files name
/// the envelope fields differently and only `matchState` is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEnvelope {
    #[serde(rename = "matchState")]
    pub match_state: MatchState,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl ExportEnvelope {
    pub fn new(match_state: MatchState, timestamp: DateTime<Utc>) -> Self {
        Self {
            match_state,
            timestamp,
            version: SCHEMA_VERSION.to_string(),
        }
    }
}

/// Serialize a state into export file bytes
pub fn export_bytes(state: &MatchState, at: DateTime<Utc>) -> PersistResult<Vec<u8>> {
    let envelope = ExportEnvelope::new(state.clone(), at);
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// File name for an export, e.g. `padel-match-2024-05-01.json`
pub fn export_file_name(domain: &str, at: DateTime<Utc>) -> String {
    format!("{}-match-{}.json", domain, iso_date(at))
}

/// Write an export file into `dir` and return its path
pub fn export_to_dir<P: AsRef<Path>>(
    state: &MatchState,
    dir: P,
    domain: &str,
    at: DateTime<Utc>,
) -> PersistResult<PathBuf> {
    let path = dir.as_ref().join(export_file_name(domain, at));
    let bytes = export_bytes(state, at)?;
    atomic_write(&path, &bytes)?;

    info!(
        path = %path.display(),
        events = state.event_count(),
        "exported match"
    );
    Ok(path)
}

/// Decode and validate an import payload
///
/// Requires `matchState`, `matchState.players`, and an array-shaped
/// `matchState.eventLog` (or legacy `statHistory`). The decoded state must
/// also satisfy the match invariants.
pub fn parse_import(bytes: &[u8]) -> Result<MatchState, ImportError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ImportError::ParseFailure(e.to_string()))?;

    let match_state = value
        .get("matchState")
        .ok_or_else(|| ImportError::InvalidFormat("missing matchState".to_string()))?;

    if match_state.get("players").is_none() {
        return Err(ImportError::InvalidFormat(
            "missing matchState.players".to_string(),
        ));
    }

    let history = match_state
        .get("eventLog")
        .or_else(|| match_state.get("statHistory"));
    match history {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(ImportError::InvalidFormat(
                "event history is not a list".to_string(),
            ))
        }
        None => {
            return Err(ImportError::InvalidFormat(
                "missing matchState.eventLog".to_string(),
            ))
        }
    }

    match value.get("version").or_else(|| value.get("schemaVersion")) {
        Some(Value::String(v)) if v == SCHEMA_VERSION => {}
        other => warn!(version = ?other, "importing file with unexpected schema version"),
    }

    let state: MatchState = serde_json::from_value(match_state.clone())
        .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;

    state.check_invariants().map_err(ImportError::InvalidFormat)?;

    Ok(state)
}
