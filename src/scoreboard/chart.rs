//! Chart series builder
//!
//! Replays the event log into one row per point plus a leading baseline.
//! The series is derived from the log alone, so it can be rebuilt at any
//! time and agrees with the roster produced by `project_all` on every prefix.

use crate::types::{ChartRow, ScoringEvent, PLAYER_COUNT};

use super::projection::value_of;

/// Lazy iterator over chart rows
///
/// A clone continues from the same position. Call [`chart_series`] again to
/// replay from the baseline.
#[derive(Debug, Clone)]
pub struct ChartSeries<'a> {
    events: &'a [ScoringEvent],
    /// Rows already yielded, baseline included
    emitted: usize,
    scores: [i32; PLAYER_COUNT],
}

impl<'a> ChartSeries<'a> {
    pub fn new(events: &'a [ScoringEvent]) -> Self {
        Self {
            events,
            emitted: 0,
            scores: [0; PLAYER_COUNT],
        }
    }
}

impl Iterator for ChartSeries<'_> {
    type Item = ChartRow;

    fn next(&mut self) -> Option<ChartRow> {
        if self.emitted == 0 {
            self.emitted = 1;
            return Some(ChartRow::baseline());
        }

        let event = self.events.get(self.emitted - 1)?;
        if let Some(score) = self.scores.get_mut(event.player_index) {
            *score += value_of(event.kind);
        }
        self.emitted += 1;

        Some(ChartRow {
            point: event.sequence_number,
            scores: self.scores,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.events.len() + 1 - self.emitted;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChartSeries<'_> {}

impl std::iter::FusedIterator for ChartSeries<'_> {}

/// Build the chart series for a log
pub fn chart_series(events: &[ScoringEvent]) -> ChartSeries<'_> {
    ChartSeries::new(events)
}

/// Render the full series as JSON rows keyed by display name
pub fn chart_json(events: &[ScoringEvent], names: &[String]) -> serde_json::Value {
    serde_json::Value::Array(chart_series(events).map(|row| row.to_json(names)).collect())
}
