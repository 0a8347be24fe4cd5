//! Data types for the padel tracker
//!
//! This module contains all the core data structures used throughout the application.

mod chart;
mod error;
mod event;
mod player;
mod state;
mod team;

pub use chart::ChartRow;
pub use error::{MatchError, MatchResult};
pub use event::{ScoringEvent, StatKind};
pub use player::Player;
pub use state::{MatchState, PLAYER_COUNT};
pub use team::{Team, TeamStats};

/// Version tag written into export files
pub const SCHEMA_VERSION: &str = "1.0";
