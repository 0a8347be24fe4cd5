//! Team aggregation

use crate::types::{MatchResult, MatchState, Team, TeamStats};

/// Summed stats for one team
///
/// A match that has not started yields all zeros.
pub fn team_stats(state: &MatchState, team: Team) -> TeamStats {
    if !state.started {
        return TeamStats::default();
    }

    team.members()
        .iter()
        .filter_map(|&i| state.players.get(i))
        .fold(TeamStats::default(), |acc, player| TeamStats {
            winners: acc.winners + player.winners,
            unforced_errors: acc.unforced_errors + player.unforced_errors,
            score: acc.score + player.score,
        })
}

/// Summed stats for a team given by index (0 or 1)
///
/// The not-started check comes first, so any index yields zeros before the
/// match begins.
pub fn team_stats_by_index(state: &MatchState, team_index: usize) -> MatchResult<TeamStats> {
    if !state.started {
        return Ok(TeamStats::default());
    }
    Ok(team_stats(state, Team::try_from(team_index)?))
}

/// Stats for both teams, first team first
pub fn both_teams(state: &MatchState) -> [TeamStats; 2] {
    Team::ALL.map(|team| team_stats(state, team))
}
