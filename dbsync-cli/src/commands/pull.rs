//! Startup sync from the bucket.

use super::emit;
use anyhow::{Context, Result, bail};
use dbsync_cloud::{StartupOutcome, SyncEngine};

/// Run the pull command.
pub async fn run(engine: &SyncEngine, json: bool) -> Result<()> {
    let config = engine.config();
    let report = engine
        .sync_from_storage()
        .await
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    let db = config.db_path();
    let remote = config.remote_uri();
    let human = match &report.outcome {
        StartupOutcome::Restored { bytes } => {
            format!("Database loaded from {remote} into {} ({bytes} bytes)", db.display())
        }
        StartupOutcome::Seeded { bytes, .. } => {
            format!("New database created and uploaded to {remote} ({bytes} bytes)")
        }
        StartupOutcome::SeededLocalOnly { reason } => {
            format!("New database created at {} but not uploaded: {reason}", db.display())
        }
        StartupOutcome::LocalOnly => {
            format!("No remote credentials; using local database {}", db.display())
        }
        StartupOutcome::Fallback { reason } => {
            format!("Could not sync from {remote} ({reason}); using local database {}", db.display())
        }
    };
    emit(json, &report, &human)?;

    if !report.local_ready {
        bail!("Local database at {} could not be initialized", db.display());
    }
    Ok(())
}
