//! Scoring event types
//!
//! Events are the source of truth for a match: every counter on every
//! player is derived from the ordered log of `ScoringEvent`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two stat categories tracked per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    /// A point won outright, worth +2
    Winner,
    /// A point lost without pressure, worth -1
    UnforcedError,
}

impl StatKind {
    /// Score contribution of one event of this kind
    pub fn value(self) -> i32 {
        match self {
            StatKind::Winner => 2,
            StatKind::UnforcedError => -1,
        }
    }

    /// Short label used in console output
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Winner => "W",
            StatKind::UnforcedError => "UE",
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatKind::Winner => write!(f, "winner"),
            StatKind::UnforcedError => write!(f, "unforced error"),
        }
    }
}

/// An immutable entry in the match event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringEvent {
    /// 1-based, gapless position in the log
    #[serde(rename = "sequenceNumber")]
    pub sequence_number: u64,

    /// Index into the roster, 0..=3
    #[serde(rename = "playerIndex")]
    pub player_index: usize,

    pub kind: StatKind,

    #[serde(rename = "occurredAt")]
    pub occurred_at: DateTime<Utc>,
}

impl ScoringEvent {
    /// Create an event stamped with the current time
    pub fn new(sequence_number: u64, player_index: usize, kind: StatKind) -> Self {
        Self::with_timestamp(sequence_number, player_index, kind, Utc::now())
    }

    /// Create an event with an explicit timestamp
    pub fn with_timestamp(
        sequence_number: u64,
        player_index: usize,
        kind: StatKind,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence_number,
            player_index,
            kind,
            occurred_at,
        }
    }

    /// Score contribution of this event
    pub fn value(&self) -> i32 {
        self.kind.value()
    }
}
