//! Event log operations
//!
//! The log is append-only: events are never edited or removed individually.
//! The only way to shrink it is [`clear`], used when a match is reset.

use chrono::{DateTime, Utc};

use crate::types::{MatchError, MatchResult, MatchState, ScoringEvent, StatKind, PLAYER_COUNT};

use super::projection::apply_event;

/// Append one event stamped with the current time
///
/// Assigns the next sequence number and updates the affected player in the
/// same step, so the log and the roster never drift apart.
pub fn append(state: &mut MatchState, player_index: usize, kind: StatKind) -> MatchResult<ScoringEvent> {
    append_at(state, player_index, kind, Utc::now())
}

/// Append one event with an explicit timestamp
pub fn append_at(
    state: &mut MatchState,
    player_index: usize,
    kind: StatKind,
    occurred_at: DateTime<Utc>,
) -> MatchResult<ScoringEvent> {
    if !state.started {
        return Err(MatchError::NotStarted);
    }
    if player_index >= PLAYER_COUNT {
        return Err(MatchError::PlayerOutOfRange(player_index));
    }

    let sequence_number = state.event_log.len() as u64 + 1;
    let event = ScoringEvent::with_timestamp(sequence_number, player_index, kind, occurred_at);

    state.players = apply_event(&state.players, &event)?;
    state.event_log.push(event.clone());

    Ok(event)
}

/// Empty the log
pub(crate) fn clear(state: &mut MatchState) {
    state.event_log.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;

    fn started() -> MatchState {
        MatchState::started_with(["A", "B", "C", "D"].into_iter().map(Player::new).collect())
    }

    #[test]
    fn test_append_assigns_sequence_numbers() {
        let mut state = started();

        let first = append(&mut state, 1, StatKind::Winner).unwrap();
        let second = append(&mut state, 3, StatKind::UnforcedError).unwrap();

        assert_eq!(first.sequence_number, 1);
        assert_eq!(second.sequence_number, 2);
        assert_eq!(state.event_log, vec![first, second]);
        assert_eq!(state.players[1].score, 2);
        assert_eq!(state.players[3].score, -1);
    }

    #[test]
    fn test_append_requires_started_match() {
        let mut state = MatchState::new();
        assert_eq!(
            append(&mut state, 0, StatKind::Winner),
            Err(MatchError::NotStarted)
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_append_rejects_bad_index_without_mutation() {
        let mut state = started();
        append(&mut state, 0, StatKind::Winner).unwrap();
        let before = state.clone();

        assert_eq!(
            append(&mut state, 7, StatKind::Winner),
            Err(MatchError::PlayerOutOfRange(7))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut state = started();
        append(&mut state, 0, StatKind::Winner).unwrap();
        clear(&mut state);
        assert!(state.event_log.is_empty());
    }
}
