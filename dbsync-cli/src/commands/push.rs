//! Upload the local database to the bucket.

use super::emit;
use anyhow::Result;
use dbsync_cloud::{PushOutcome, SyncEngine};

/// Run the push command.
///
/// The credential probe runs once for this process, the same as at startup.
pub async fn run(engine: &SyncEngine, json: bool) -> Result<()> {
    let state = engine.probe().await;
    let outcome = engine.sync_to_storage(&state).await;

    let config = engine.config();
    let human = match &outcome {
        PushOutcome::Skipped => "Remote sync unavailable; nothing uploaded".to_string(),
        PushOutcome::MissingLocalFile => {
            format!("Database file not found: {}", config.db_path().display())
        }
        PushOutcome::Uploaded {
            bytes,
            content_hash,
        } => format!(
            "Database synced to {} ({bytes} bytes, sha256 {content_hash})",
            config.remote_uri()
        ),
        PushOutcome::Failed { reason } => format!("Error uploading database: {reason}"),
    };
    emit(json, &outcome, &human)
}
