//! State transitions
//!
//! Every change to a match goes through [`reduce`]. The function takes the
//! current state by value and returns the next one, so a failed transition
//! leaves the caller's state untouched.

use tracing::debug;

use crate::types::{MatchError, MatchResult, MatchState, Player, StatKind, PLAYER_COUNT};

use super::log;

/// A user-level action on the match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Begin a match with four player names
    Start { names: Vec<String> },
    /// Record one stat for one player
    Record { player_index: usize, kind: StatKind },
    /// Discard the match
    Reset,
    /// Swap in an externally supplied state (import)
    Replace(MatchState),
}

/// Validate and trim the four player names
pub fn validate_names<S: AsRef<str>>(names: &[S]) -> MatchResult<Vec<String>> {
    if names.len() != PLAYER_COUNT {
        return Err(MatchError::WrongPlayerCount {
            expected: PLAYER_COUNT,
            actual: names.len(),
        });
    }

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                Err(MatchError::EmptyPlayerName { position: i + 1 })
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

/// Apply an action to a state, producing the next state
pub fn reduce(mut state: MatchState, action: Action) -> MatchResult<MatchState> {
    match action {
        Action::Start { names } => {
            if state.started {
                return Err(MatchError::AlreadyStarted);
            }
            let names = validate_names(&names)?;
            debug!(players = ?names, "starting match");
            Ok(MatchState::started_with(
                names.into_iter().map(Player::new).collect(),
            ))
        }

        Action::Record { player_index, kind } => {
            let event = log::append(&mut state, player_index, kind)?;
            debug!(
                seq = event.sequence_number,
                player = player_index,
                kind = %kind,
                "recorded event"
            );
            Ok(state)
        }

        Action::Reset => {
            log::clear(&mut state);
            state.players.clear();
            state.started = false;
            Ok(state)
        }

        Action::Replace(next) => Ok(next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(names: [&str; 4]) -> Action {
        Action::Start {
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_start_trims_names() {
        let state = reduce(MatchState::new(), start([" A ", "B", "C\t", "D"])).unwrap();

        assert!(state.started);
        assert_eq!(state.player_names(), vec!["A", "B", "C", "D"]);
        assert!(state.event_log.is_empty());
    }

    #[test]
    fn test_start_rejects_blank_name() {
        let result = reduce(MatchState::new(), start(["A", "  ", "C", "D"]));
        assert_eq!(result, Err(MatchError::EmptyPlayerName { position: 2 }));
    }

    #[test]
    fn test_start_rejects_wrong_count() {
        let result = reduce(
            MatchState::new(),
            Action::Start {
                names: vec!["A".to_string(), "B".to_string()],
            },
        );
        assert_eq!(
            result,
            Err(MatchError::WrongPlayerCount {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let state = reduce(MatchState::new(), start(["A", "B", "C", "D"])).unwrap();
        assert_eq!(
            reduce(state, start(["E", "F", "G", "H"])),
            Err(MatchError::AlreadyStarted)
        );
    }

    #[test]
    fn test_record_and_reset() {
        let state = reduce(MatchState::new(), start(["A", "B", "C", "D"])).unwrap();
        let state = reduce(
            state,
            Action::Record {
                player_index: 0,
                kind: StatKind::Winner,
            },
        )
        .unwrap();
        assert_eq!(state.event_count(), 1);

        let state = reduce(state, Action::Reset).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_reset_matches_fresh_state() {
        let mut state = reduce(MatchState::new(), start(["A", "B", "C", "D"])).unwrap();
        for player_index in [0, 3, 1] {
            state = reduce(
                state,
                Action::Record {
                    player_index,
                    kind: StatKind::UnforcedError,
                },
            )
            .unwrap();
        }

        assert_eq!(reduce(state, Action::Reset).unwrap(), MatchState::new());
    }

    #[test]
    fn test_replace_swaps_whole_state() {
        let current = reduce(MatchState::new(), start(["A", "B", "C", "D"])).unwrap();
        let current = reduce(
            current,
            Action::Record {
                player_index: 2,
                kind: StatKind::Winner,
            },
        )
        .unwrap();

        let incoming = reduce(MatchState::new(), start(["W", "X", "Y", "Z"])).unwrap();
        let next = reduce(current, Action::Replace(incoming.clone())).unwrap();

        assert_eq!(next, incoming);
        assert_eq!(next.event_count(), 0);
    }

    #[test]
    fn test_record_before_start() {
        let result = reduce(
            MatchState::new(),
            Action::Record {
                player_index: 0,
                kind: StatKind::Winner,
            },
        );
        assert_eq!(result, Err(MatchError::NotStarted));
    }
}
