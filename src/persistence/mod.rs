//! Persistence Module
//!
//! Durable mirroring of match state and portable match files:
//! - `KeyValueStore`: load / save / clear primitives (`FileStore`, `MemoryStore`)
//! - `PersistenceGateway`: stores the whole `MatchState` under one key
//! - `transfer`: versioned export envelope and validated import
//! - `import`: ticketed single-shot file reads for import
//!
//! # Write path
//!
//! ```text
//! ┌────────┐    ┌─────────┐    ┌────────────────────┐    ┌───────────────┐
//! │ Action │───►│ reduce  │───►│ PersistenceGateway │───►│ <key>.json    │
//! │        │    │         │    │ save (every change)│    │ (atomic write)│
//! └────────┘    └─────────┘    └────────────────────┘    └───────────────┘
//! ```
//!
//! # Import path
//!
//! ```text
//! ┌─────────────┐    ┌───────────────┐    ┌──────────────┐    ┌─────────────┐
//! │ begin ticket│───►│ async read    │───►│ parse_import │───►│ confirm →   │
//! │             │    │ (oneshot)     │    │ (validate)   │    │ store write │
//! └─────────────┘    └───────────────┘    └──────────────┘    └─────────────┘
//! ```

mod gateway;
mod import;
mod store;
mod transfer;

pub use gateway::{decode_state, encode_state, PersistenceGateway, DEFAULT_STORAGE_KEY};
pub use import::{read_import_file, ImportTicket, ImportTracker, PendingImport};
pub use store::{FileStore, KeyValueStore, MemoryStore, PersistError, PersistResult};
pub use transfer::{
    export_bytes, export_file_name, export_to_dir, parse_import, ExportEnvelope, ImportError,
};
