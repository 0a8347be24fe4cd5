//! Scoreboard - match state engine
//!
//! Holds the single `MatchState` for a session, routes every change through
//! the reducer, and mirrors the result to the durable store.
//!
//! - `log`: append-only event log operations
//! - `projection`: derive counters and scores from the log
//! - `team`: two-player team sums
//! - `chart`: per-point score series for plotting
//! - `reducer`: `(state, action) -> state'` transitions

pub mod chart;
pub mod log;
pub mod projection;
pub mod reducer;
pub mod team;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::persistence::{
    export_bytes, export_to_dir, parse_import, ImportError, ImportTicket, ImportTracker,
    KeyValueStore, PersistError, PersistResult, PersistenceGateway,
};
use crate::types::{
    MatchError, MatchResult, MatchState, ScoringEvent, StatKind, Team, TeamStats,
};

pub use chart::{chart_json, chart_series, ChartSeries};
pub use projection::{apply_event, project_all, value_of};
pub use reducer::{reduce, validate_names, Action};
pub use team::{both_teams, team_stats, team_stats_by_index};

/// What happened to a completed import read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The payload replaced the in-memory state and awaits confirmation
    Applied,
    /// A newer import was already delivered; the payload was dropped
    Stale,
}

/// The match state container
pub struct Scoreboard<S: KeyValueStore> {
    state: MatchState,
    gateway: PersistenceGateway<S>,
    imports: ImportTracker,
    /// In-memory state came from an import that has not been written yet
    unconfirmed_import: bool,
}

impl<S: KeyValueStore> Scoreboard<S> {
    /// Create an empty scoreboard without reading the store
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self {
            state: MatchState::new(),
            gateway,
            imports: ImportTracker::new(),
            unconfirmed_import: false,
        }
    }

    /// Create a scoreboard from whatever the store holds
    ///
    /// A corrupted payload is logged and replaced by the empty state; other
    /// store errors are returned.
    pub fn open(gateway: PersistenceGateway<S>) -> PersistResult<Self> {
        let state = match gateway.load() {
            Ok(state) => state,
            Err(PersistError::Corrupted(reason)) => {
                warn!(key = gateway.key(), %reason, "discarding unreadable stored match");
                MatchState::new()
            }
            Err(e) => return Err(e),
        };

        if state.started {
            info!(
                players = ?state.player_names(),
                events = state.event_count(),
                "resumed match"
            );
        }

        let mut board = Self::new(gateway);
        board.state = state;
        Ok(board)
    }

    /// Current state
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    /// Apply an action and mirror the result to the store
    ///
    /// On error the state is left exactly as it was.
    pub fn dispatch(&mut self, action: Action) -> MatchResult<()> {
        self.apply(action)?;
        self.unconfirmed_import = false;
        self.persist();
        Ok(())
    }

    /// Apply an action in memory only
    fn apply(&mut self, action: Action) -> MatchResult<()> {
        self.state = reduce(self.state.clone(), action)?;
        Ok(())
    }

    /// Start a match with four names
    pub fn start<N: AsRef<str>>(&mut self, names: &[N]) -> MatchResult<()> {
        let names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self.dispatch(Action::Start { names })?;
        info!(players = ?self.state.player_names(), "match started");
        Ok(())
    }

    /// Record one stat
    ///
    /// Before the match starts this is a silent no-op and returns `None`.
    pub fn record(&mut self, player_index: usize, kind: StatKind) -> MatchResult<Option<ScoringEvent>> {
        match self.dispatch(Action::Record { player_index, kind }) {
            Ok(()) => Ok(self.state.event_log.last().cloned()),
            Err(MatchError::NotStarted) => {
                debug!(player_index, %kind, "ignoring stat before match start");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Discard the match and the stored copy
    pub fn reset(&mut self) {
        // Reset cannot fail
        let _ = self.dispatch(Action::Reset);
        info!("match reset");
    }

    /// Summed stats for one team
    pub fn team_stats(&self, team: Team) -> TeamStats {
        team_stats(&self.state, team)
    }

    /// Summed stats for a team given by index
    pub fn team_stats_by_index(&self, team_index: usize) -> MatchResult<TeamStats> {
        team_stats_by_index(&self.state, team_index)
    }

    /// Chart series for the current log
    pub fn chart(&self) -> ChartSeries<'_> {
        chart_series(&self.state.event_log)
    }

    /// Chart rows keyed by player name
    pub fn chart_json(&self) -> serde_json::Value {
        let names: Vec<String> = self.state.players.iter().map(|p| p.name.clone()).collect();
        chart_json(&self.state.event_log, &names)
    }

    /// Export file bytes for the current state
    pub fn export(&self, at: DateTime<Utc>) -> PersistResult<Vec<u8>> {
        export_bytes(&self.state, at)
    }

    /// Write an export file into `dir`
    pub fn export_to_dir<P: AsRef<Path>>(
        &self,
        dir: P,
        domain: &str,
        at: DateTime<Utc>,
    ) -> PersistResult<PathBuf> {
        export_to_dir(&self.state, dir, domain, at)
    }

    /// Ticket for an import whose bytes will arrive later
    pub fn begin_import(&self) -> ImportTicket {
        self.imports.begin()
    }

    /// Deliver the bytes for a ticketed import
    ///
    /// Stale tickets are dropped. A valid payload replaces the in-memory
    /// state at once but is only written to the store by
    /// [`confirm_import`](Self::confirm_import).
    pub fn complete_import(
        &mut self,
        ticket: ImportTicket,
        bytes: &[u8],
    ) -> Result<ImportOutcome, ImportError> {
        if !self.imports.deliver(ticket) {
            debug!(token = ticket.token(), "dropping superseded import");
            return Ok(ImportOutcome::Stale);
        }

        let next = parse_import(bytes).inspect_err(|e| {
            warn!(token = ticket.token(), error = %e, "import rejected");
        })?;

        info!(
            token = ticket.token(),
            players = ?next.player_names(),
            events = next.event_count(),
            "imported match"
        );
        // Durable write waits for confirm_import
        self.apply(Action::Replace(next))
            .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;
        self.unconfirmed_import = true;
        Ok(ImportOutcome::Applied)
    }

    /// Import bytes that are already in hand
    pub fn import(&mut self, bytes: &[u8]) -> Result<(), ImportError> {
        let ticket = self.begin_import();
        self.complete_import(ticket, bytes).map(|_| ())
    }

    /// True while the in-memory state is an import not yet written to the store
    pub fn has_unconfirmed_import(&self) -> bool {
        self.unconfirmed_import
    }

    /// Write the imported state to the store
    ///
    /// Returns false if there was no unconfirmed import.
    pub fn confirm_import(&mut self) -> PersistResult<bool> {
        if !self.unconfirmed_import {
            return Ok(false);
        }
        self.gateway.save(&self.state)?;
        self.unconfirmed_import = false;
        info!("imported match saved");
        Ok(true)
    }

    /// Keep the imported state in memory only
    pub fn decline_import(&mut self) {
        if self.unconfirmed_import {
            debug!("imported match kept in memory only");
        }
        self.unconfirmed_import = false;
    }

    /// Mirror the current state; failures are logged, not returned
    fn persist(&self) {
        if let Err(e) = self.gateway.save(&self.state) {
            error!(key = self.gateway.key(), error = %e, "failed to save match state");
        }
    }
}
