//! Match state container

use serde::{Deserialize, Serialize};

use super::{Player, ScoringEvent, StatKind};

/// Number of players in a match
pub const PLAYER_COUNT: usize = 4;

/// Full state of one match
///
/// Before the match starts both `players` and `event_log` are empty.
/// Once started there are exactly four players and the log length equals
/// the sum of every player's winners and unforced errors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchState {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub started: bool,
    #[serde(rename = "eventLog", alias = "statHistory", default)]
    pub event_log: Vec<ScoringEvent>,
}

impl MatchState {
    /// The empty, not-started state
    pub fn new() -> Self {
        Self::default()
    }

    /// A freshly started match with the given roster and an empty log
    pub fn started_with(players: Vec<Player>) -> Self {
        Self {
            players,
            started: true,
            event_log: Vec::new(),
        }
    }

    /// Check if this is the empty, not-started state
    pub fn is_empty(&self) -> bool {
        !self.started && self.players.is_empty() && self.event_log.is_empty()
    }

    /// Number of events recorded so far
    pub fn event_count(&self) -> usize {
        self.event_log.len()
    }

    /// Display names in roster order
    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }

    /// Check the structural invariants that tie roster and log together
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.started {
            if !self.players.is_empty() || !self.event_log.is_empty() {
                return Err("match not started but players or events are present".to_string());
            }
            return Ok(());
        }

        if self.players.len() != PLAYER_COUNT {
            return Err(format!(
                "expected {} players, found {}",
                PLAYER_COUNT,
                self.players.len()
            ));
        }

        if let Some(pos) = self.players.iter().position(|p| p.name.trim().is_empty()) {
            return Err(format!("player {} has an empty name", pos + 1));
        }

        let mut tallies = vec![(0u32, 0u32); PLAYER_COUNT];
        for (i, event) in self.event_log.iter().enumerate() {
            let expected = i as u64 + 1;
            if event.sequence_number != expected {
                return Err(format!(
                    "event {} has sequence number {}",
                    expected, event.sequence_number
                ));
            }
            let Some(tally) = tallies.get_mut(event.player_index) else {
                return Err(format!(
                    "event {} references player index {}",
                    expected, event.player_index
                ));
            };
            match event.kind {
                StatKind::Winner => tally.0 += 1,
                StatKind::UnforcedError => tally.1 += 1,
            }
        }

        for (player, (winners, errors)) in self.players.iter().zip(tallies) {
            if player.winners != winners || player.unforced_errors != errors {
                return Err(format!("counters for {} disagree with the log", player.name));
            }
            if player.score != player.expected_score() {
                return Err(format!("score for {} disagrees with its counters", player.name));
            }
        }

        Ok(())
    }
}
