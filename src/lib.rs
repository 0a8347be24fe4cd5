//! Padel Tracker
//!
//! A live scorekeeping engine for four-player padel matches. Two stats are
//! recorded per player (winners and unforced errors); everything else is
//! derived from the ordered event log.
//!
//! # Features
//!
//! - **Event-sourced**: the event log is the source of truth; scores are a fold over it
//! - **Team totals**: fixed pairs of player indices {0,1} and {2,3}
//! - **Chart series**: per-point running scores with a zero baseline
//! - **Mirror-on-write**: every change is written to a durable key-value store
//! - **Portable files**: versioned export and validated, all-or-nothing import
//!
//! # Modules
//!
//! - `types`: Core data structures (Player, ScoringEvent, MatchState)
//! - `scoreboard`: State engine with reducer, projection, teams and chart
//! - `persistence`: Key-value stores, gateway, export/import
//! - `console`: Line-oriented input adapter
//! - `config`: Environment-driven configuration
//! - `utils`: Utility functions (atomic writes, timestamps, logging)
//!
//! # Example
//!
//! ```no_run
//! use padel_tracker::persistence::{FileStore, PersistenceGateway};
//! use padel_tracker::types::{StatKind, Team};
//! use padel_tracker::Scoreboard;
//!
//! let gateway = PersistenceGateway::new(FileStore::new("data"));
//! let mut board = Scoreboard::open(gateway).unwrap();
//! board.start(&["Ana", "Bea", "Carla", "Dani"]).unwrap();
//! board.record(0, StatKind::Winner).unwrap();
//! assert_eq!(board.team_stats(Team::First).score, 2);
//! ```

pub mod config;
pub mod console;
pub mod persistence;
pub mod scoreboard;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::TrackerConfig;
pub use persistence::{FileStore, ImportError, KeyValueStore, MemoryStore, PersistenceGateway};
pub use scoreboard::{Action, ChartSeries, ImportOutcome, Scoreboard};
pub use types::{
    ChartRow, MatchError, MatchState, Player, ScoringEvent, StatKind, Team, TeamStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
