//! Import requests
//!
//! Reading a file for import is the one asynchronous step in the engine. Each
//! request gets a ticket with a monotonically increasing token; when a read
//! completes, its ticket is checked against the newest import already
//! delivered so a slow, superseded read cannot overwrite a newer one.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::oneshot;
use tracing::debug;

/// Handle for one import request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportTicket {
    token: u64,
}

impl ImportTicket {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Issues import tickets and tracks the newest delivered one
#[derive(Debug, Default)]
pub struct ImportTracker {
    issued: AtomicU64,
    delivered: AtomicU64,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next ticket
    pub fn begin(&self) -> ImportTicket {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, "import requested");
        ImportTicket { token }
    }

    /// Mark a ticket delivered
    ///
    /// Returns false if a newer (or the same) ticket was already delivered,
    /// in which case the caller must drop the payload.
    pub fn deliver(&self, ticket: ImportTicket) -> bool {
        let previous = self.delivered.fetch_max(ticket.token, Ordering::SeqCst);
        previous < ticket.token
    }

    /// Token of the newest delivered ticket, 0 if none
    pub fn last_delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }
}

/// A file read in flight, resolving exactly once
pub struct PendingImport {
    pub ticket: ImportTicket,
    rx: oneshot::Receiver<io::Result<Vec<u8>>>,
}

impl PendingImport {
    /// Wait for the read to finish
    pub async fn wait(self) -> (ImportTicket, io::Result<Vec<u8>>) {
        let result = match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "import read was dropped before completing",
            )),
        };
        (self.ticket, result)
    }
}

/// Start reading `path` on a background task
///
/// Must be called from within a tokio runtime.
pub fn read_import_file(ticket: ImportTicket, path: impl Into<PathBuf>) -> PendingImport {
    let path = path.into();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = tokio::fs::read(&path).await;
        debug!(path = %path.display(), ok = result.is_ok(), "import read finished");
        // The receiver may be gone if the caller stopped waiting
        let _ = tx.send(result);
    });

    PendingImport { ticket, rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tickets_increase() {
        let tracker = ImportTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        assert!(b > a);
        assert_eq!(a.token(), 1);
        assert_eq!(b.token(), 2);
    }

    #[test]
    fn test_stale_ticket_rejected_after_newer_delivery() {
        let tracker = ImportTracker::new();
        let old = tracker.begin();
        let new = tracker.begin();

        assert!(tracker.deliver(new));
        assert!(!tracker.deliver(old));
        assert_eq!(tracker.last_delivered(), new.token());
    }

    #[test]
    fn test_older_ticket_accepted_if_newer_still_pending() {
        let tracker = ImportTracker::new();
        let old = tracker.begin();
        let new = tracker.begin();

        assert!(tracker.deliver(old));
        assert!(tracker.deliver(new));
    }

    #[test]
    fn test_ticket_delivered_once() {
        let tracker = ImportTracker::new();
        let ticket = tracker.begin();
        assert!(tracker.deliver(ticket));
        assert!(!tracker.deliver(ticket));
    }

    #[tokio::test]
    async fn test_read_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("m.json");
        std::fs::write(&path, b"{}").unwrap();

        let tracker = ImportTracker::new();
        let (ticket, bytes) = read_import_file(tracker.begin(), &path).wait().await;

        assert_eq!(ticket.token(), 1);
        assert_eq!(bytes.unwrap(), b"{}".to_vec());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let tracker = ImportTracker::new();

        let (_, result) = read_import_file(tracker.begin(), temp_dir.path().join("none.json"))
            .wait()
            .await;

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
