//! Trigger keys
//!
//! Eight fixed keys, two per player: odd keys record a winner, even keys an
//! unforced error.

use crate::types::{StatKind, PLAYER_COUNT};

/// Map a trigger key to `(player_index, kind)`
pub fn binding(key: char) -> Option<(usize, StatKind)> {
    let digit = key.to_digit(10)? as usize;
    if !(1..=8).contains(&digit) {
        return None;
    }
    let player = (digit - 1) / 2;
    let kind = if digit % 2 == 1 {
        StatKind::Winner
    } else {
        StatKind::UnforcedError
    };
    Some((player, kind))
}

/// The key bound to `(player_index, kind)`
pub fn key_for(player_index: usize, kind: StatKind) -> Option<char> {
    if player_index >= PLAYER_COUNT {
        return None;
    }
    let offset = match kind {
        StatKind::Winner => 1,
        StatKind::UnforcedError => 2,
    };
    char::from_digit((player_index * 2 + offset) as u32, 10)
}
