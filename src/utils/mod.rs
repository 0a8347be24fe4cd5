//! Utility functions and helpers
//!
//! Atomic file writes, timestamp formatting and logging setup.

pub mod atomic;
pub mod logging;
pub mod time;

pub use atomic::{atomic_write, cleanup_temp_files, AtomicError, AtomicResult};
pub use logging::init_logging;
pub use time::{clock, iso_date, now};
