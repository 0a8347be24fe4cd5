//! Score projection
//!
//! Derives per-player counters and scores from the event log. The same
//! `apply_event` step is used incrementally at append time and when folding
//! a whole log, so both paths agree by construction.

use crate::types::{MatchError, MatchResult, Player, ScoringEvent, StatKind};

/// Score contribution of one event of the given kind
pub fn value_of(kind: StatKind) -> i32 {
    kind.value()
}

/// Apply a single event to a roster
///
/// Only `players[event.player_index]` changes; every other entry is carried
/// over unchanged.
pub fn apply_event(players: &[Player], event: &ScoringEvent) -> MatchResult<Vec<Player>> {
    if event.player_index >= players.len() {
        return Err(MatchError::PlayerOutOfRange(event.player_index));
    }

    Ok(players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            if i == event.player_index {
                player.with_stat(event.kind)
            } else {
                player.clone()
            }
        })
        .collect())
}

/// Roster with the same names and every counter reset to zero
pub fn zeroed(players: &[Player]) -> Vec<Player> {
    players.iter().map(|p| Player::new(p.name.clone())).collect()
}

/// Rebuild the roster from scratch by folding the log over a zeroed roster
pub fn project_all(players: &[Player], event_log: &[ScoringEvent]) -> MatchResult<Vec<Player>> {
    event_log
        .iter()
        .try_fold(zeroed(players), |roster, event| apply_event(&roster, event))
}
