//! Report whether remote storage is usable.

use super::emit;
use anyhow::Result;
use dbsync_cloud::SyncEngine;

/// Run the probe command.
pub async fn run(engine: &SyncEngine, json: bool) -> Result<()> {
    let state = engine.probe().await;
    let human = format!(
        "Sync mode: {} ({})",
        state.mode(),
        engine.config().remote_uri()
    );
    emit(json, &state, &human)
}
