//! Player roster entry

use serde::{Deserialize, Serialize};

use super::StatKind;

/// One of the four players on court
///
/// `score` is always `2 * winners - unforced_errors`; it is stored rather than
/// computed so that persisted payloads carry the same shape the UI renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub winners: u32,
    #[serde(rename = "unforcedErrors", default)]
    pub unforced_errors: u32,
    #[serde(default)]
    pub score: i32,
}

impl Player {
    /// Create a player with all counters at zero
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            winners: 0,
            unforced_errors: 0,
            score: 0,
        }
    }

    /// Copy of this player with one more stat of the given kind
    pub fn with_stat(&self, kind: StatKind) -> Self {
        let mut next = self.clone();
        match kind {
            StatKind::Winner => next.winners += 1,
            StatKind::UnforcedError => next.unforced_errors += 1,
        }
        next.score += kind.value();
        next
    }

    /// Number of scoring events recorded against this player
    pub fn event_count(&self) -> u32 {
        self.winners + self.unforced_errors
    }

    /// Score implied by the counters alone
    pub fn expected_score(&self) -> i32 {
        2 * self.winners as i32 - self.unforced_errors as i32
    }
}
