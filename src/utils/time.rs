//! Time and timestamp utilities

use chrono::{DateTime, Utc};

/// Current time in UTC
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar date used in export file names, e.g. `2024-05-01`
pub fn iso_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Wall-clock time of day for console output, e.g. `18:30:05`
pub fn clock(at: DateTime<Utc>) -> String {
    at.format("%H:%M:%S").to_string()
}
