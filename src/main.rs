//! Padel Tracker - Binary Entry Point
//!
//! Runs the console adapter on stdin/stdout against a file-backed store.

use tokio::io::{self, BufReader};
use tracing::{info, warn};

use padel_tracker::console::Console;
use padel_tracker::persistence::{FileStore, PersistenceGateway};
use padel_tracker::utils::{cleanup_temp_files, init_logging};
use padel_tracker::{Scoreboard, TrackerConfig, NAME, VERSION};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging();

    let config = TrackerConfig::from_env();
    info!(
        version = VERSION,
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "{} starting",
        NAME
    );

    // Leftovers from a write interrupted mid-rename
    match cleanup_temp_files(&config.data_dir) {
        Ok(0) => {}
        Ok(n) => warn!(count = n, "removed interrupted writes"),
        Err(e) => warn!(error = %e, "could not scan data directory"),
    }

    let store = FileStore::new(&config.data_dir);
    let gateway = PersistenceGateway::with_key(store, config.storage_key.clone());
    let board = Scoreboard::open(gateway)?;

    let mut console = Console::new(board, BufReader::new(io::stdin()), io::stdout())
        .with_export(config.export_dir.clone(), config.domain.clone());

    tokio::select! {
        result = console.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted; match state is already saved");
        }
    }

    Ok(())
}
