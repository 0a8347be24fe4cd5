//! Chart row type

use serde_json::{json, Map, Value};

use super::PLAYER_COUNT;

/// One point on the score-progression chart
///
/// Scores are held by roster index. Display names are attached only when the
/// row is rendered with [`ChartRow::to_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRow {
    /// 0 for the baseline row, otherwise the event's sequence number
    pub point: u64,
    /// Running score of each player after this point
    pub scores: [i32; PLAYER_COUNT],
}

impl ChartRow {
    /// Reference-line value carried by every row
    pub const ZERO: i32 = 0;

    /// The leading all-zero row
    pub fn baseline() -> Self {
        Self {
            point: 0,
            scores: [0; PLAYER_COUNT],
        }
    }

    /// Row keyed by display name, in roster order
    ///
    /// Two players sharing a name map to the same key and the later player
    /// wins, so such a row has fewer than four entries.
    pub fn by_name(&self, names: &[String]) -> Vec<(String, i32)> {
        let mut entries: Vec<(String, i32)> = Vec::with_capacity(PLAYER_COUNT);
        for (name, score) in names.iter().zip(self.scores) {
            match entries.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = score,
                None => entries.push((name.clone(), score)),
            }
        }
        entries
    }

    /// Render as `{"point": n, "<name>": score, ..., "zero": 0}`
    pub fn to_json(&self, names: &[String]) -> Value {
        let mut row = Map::new();
        row.insert("point".to_string(), json!(self.point));
        for (name, score) in self.by_name(names) {
            row.insert(name, json!(score));
        }
        row.insert("zero".to_string(), json!(Self::ZERO));
        Value::Object(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: [&str; 4]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_named_row_json() {
        let row = ChartRow {
            point: 2,
            scores: [2, 0, -1, 0],
        };
        let roster = names(["A", "B", "C", "D"]);
        let value = row.to_json(&roster);

        assert_eq!(value["point"], 2);
        assert_eq!(value["zero"], 0);
        assert_eq!(value["A"], 2);
        assert_eq!(value["C"], -1);
    }

    #[test]
    fn test_duplicate_names_collide() {
        let row = ChartRow {
            point: 1,
            scores: [2, 0, 0, -1],
        };
        let roster = names(["Sam", "B", "C", "Sam"]);
        let entries = row.by_name(&roster);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], ("Sam".to_string(), -1));
    }
}
