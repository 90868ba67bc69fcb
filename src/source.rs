//! One-shot record fetch task.
//!
//! Reads the JSON record source off the UI path and sends the parsed store
//! back over a channel. There is exactly one attempt per process; a failure
//! is reported once and never retried.

use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::records::RecordStore;

/// Result of the startup load, delivered to the event loop.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(RecordStore),
    /// Human-readable failure chain, already formatted for the log.
    Failed(String),
}

/// Read and parse the record source.
pub async fn fetch(path: &Path) -> Result<RecordStore> {
    debug!("Reading records from {}", path.display());
    let json = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read record source {}", path.display()))?;
    RecordStore::from_json(&json)
        .wrap_err_with(|| format!("Failed to parse record source {}", path.display()))
}

/// Spawn the fetch on the runtime and report through `tx`.
pub fn spawn_fetch(path: PathBuf, tx: mpsc::Sender<LoadOutcome>) {
    tokio::spawn(async move {
        let outcome = match fetch(&path).await {
            Ok(store) => {
                info!("Loaded {} records from {}", store.len(), path.display());
                LoadOutcome::Loaded(store)
            }
            Err(e) => LoadOutcome::Failed(format!("{e:#}")),
        };
        // The receiver only goes away when the UI is shutting down.
        let _ = tx.send(outcome).await;
    });
}
