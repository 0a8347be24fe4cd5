//! Team types

use serde::{Deserialize, Serialize};

use super::MatchError;

/// One of the two fixed pairs: players {0,1} and {2,3}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    First,
    Second,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::First, Team::Second];

    /// Roster indices of the two team members
    pub fn members(self) -> [usize; 2] {
        match self {
            Team::First => [0, 1],
            Team::Second => [2, 3],
        }
    }

    /// Zero-based team index
    pub fn index(self) -> usize {
        match self {
            Team::First => 0,
            Team::Second => 1,
        }
    }
}

impl TryFrom<usize> for Team {
    type Error = MatchError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Team::First),
            1 => Ok(Team::Second),
            other => Err(MatchError::TeamOutOfRange(other)),
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.index() + 1)
    }
}

/// Summed stats for one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamStats {
    pub winners: u32,
    #[serde(rename = "unforcedErrors")]
    pub unforced_errors: u32,
    pub score: i32,
}
