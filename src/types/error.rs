//! Match engine errors

use thiserror::Error;

/// Errors raised by state transitions and roster lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A player name was empty after trimming; the match is not started
    #[error("player {position} needs a name")]
    EmptyPlayerName { position: usize },

    /// Start was attempted with the wrong number of names
    #[error("a match needs exactly {expected} players, got {actual}")]
    WrongPlayerCount { expected: usize, actual: usize },

    #[error("match already started")]
    AlreadyStarted,

    #[error("match has not started")]
    NotStarted,

    /// Adapter contract violation: player index outside 0..=3
    #[error("player index {0} out of range")]
    PlayerOutOfRange(usize),

    /// Adapter contract violation: team index outside 0..=1
    #[error("team index {0} out of range")]
    TeamOutOfRange(usize),
}

impl MatchError {
    /// True for errors that indicate a caller bug rather than user input
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            MatchError::PlayerOutOfRange(_) | MatchError::TeamOutOfRange(_)
        )
    }
}

/// Result type for match engine operations
pub type MatchResult<T> = Result<T, MatchError>;
