//! Command implementations.

pub mod probe;
pub mod pull;
pub mod push;

use anyhow::Result;
use dbsync_cloud::credential_prober::OfflineProber;
use dbsync_cloud::s3_transport::S3Transport;
use dbsync_cloud::{SyncConfig, SyncEngine};
use dbsync_store::SqliteStoreInitializer;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Wires the engine for this process.
pub fn build_engine(config: SyncConfig, schema: String, offline: bool) -> SyncEngine {
    let initializer = Arc::new(SqliteStoreInitializer::new(config.db_path()).with_schema(schema));

    if offline {
        info!("offline mode: remote store {} disabled", config.remote_uri());
        let remote = Arc::new(S3Transport::new(config.clone()));
        SyncEngine::new(config, Arc::new(OfflineProber), remote, initializer)
    } else {
        SyncEngine::from_config(config, initializer)
    }
}

/// Prints `value` as one JSON line when `json` is set, else `human`.
pub fn emit<T: Serialize>(json: bool, value: &T, human: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{human}");
    }
    Ok(())
}
