//! Runtime configuration
//!
//! Defaults can be overridden through environment variables:
//! - `PADEL_DATA_DIR`: directory for the durable store (default `./data`)
//! - `PADEL_EXPORT_DIR`: directory export files are written to (default `.`)
//! - `PADEL_STORAGE_KEY`: key the match state is stored under
//! - `PADEL_DOMAIN`: prefix of export file names (default `padel`)

use std::env;
use std::path::PathBuf;

use crate::persistence::DEFAULT_STORAGE_KEY;

pub const ENV_DATA_DIR: &str = "PADEL_DATA_DIR";
pub const ENV_EXPORT_DIR: &str = "PADEL_EXPORT_DIR";
pub const ENV_STORAGE_KEY: &str = "PADEL_STORAGE_KEY";
pub const ENV_DOMAIN: &str = "PADEL_DOMAIN";

/// Default prefix for export file names
pub const DEFAULT_DOMAIN: &str = "padel";

/// Configuration for the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Directory holding the durable store
    pub data_dir: PathBuf,
    /// Directory export files are written to
    pub export_dir: PathBuf,
    /// Key the match state is stored under
    pub storage_key: String,
    /// Prefix for export file names
    pub domain: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            export_dir: PathBuf::from("."),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Build config from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let resolve = |value: Option<String>, fallback: PathBuf| {
            let path = value.map(PathBuf::from).unwrap_or(fallback);
            if path.is_absolute() {
                path
            } else {
                current_dir.join(path)
            }
        };

        Self {
            data_dir: resolve(non_empty(ENV_DATA_DIR), defaults.data_dir),
            export_dir: resolve(non_empty(ENV_EXPORT_DIR), defaults.export_dir),
            storage_key: non_empty(ENV_STORAGE_KEY).unwrap_or(defaults.storage_key),
            domain: non_empty(ENV_DOMAIN).unwrap_or(defaults.domain),
        }
    }
}
