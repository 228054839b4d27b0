//! Database sync engine.
//!
//! Sequences the credential prober, the remote store, and the local store
//! initializer into the two operations the application calls:
//!
//! - [`SyncEngine::sync_from_storage`] once at boot, before serving requests
//! - [`SyncEngine::sync_to_storage`] after any mutation that must survive a
//!   restart
//!
//! Startup moves through `probing -> {remote sync | local only} -> ready`.
//! Remote failures never escape either operation: they are logged and
//! downgraded to the local-only path. The only error `sync_from_storage`
//! returns is a failure to create the local data directory.
//!
//! Neither operation is safe to run concurrently with startup; both touch
//! the same local file without coordination.

use crate::config::SyncConfig;
use crate::credential_prober::{CredentialProber, EnvCredentialProber};
use crate::error::SyncResult;
use crate::remote_store::RemoteStore;
use crate::s3_transport::S3Transport;
use crate::types::*;
use dbsync_store::fs::{ensure_dir, sweep_staging};
use dbsync_store::{LocalStoreInitializer, StoreError};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Sync engine for a single database file and its remote copy.
pub struct SyncEngine {
    config: SyncConfig,
    prober: Arc<dyn CredentialProber>,
    remote: Arc<dyn RemoteStore>,
    initializer: Arc<dyn LocalStoreInitializer>,
}

impl SyncEngine {
    pub fn new(
        config: SyncConfig,
        prober: Arc<dyn CredentialProber>,
        remote: Arc<dyn RemoteStore>,
        initializer: Arc<dyn LocalStoreInitializer>,
    ) -> Self {
        Self {
            config,
            prober,
            remote,
            initializer,
        }
    }

    /// Wires the environment prober and the S3 transport from `config`.
    pub fn from_config(config: SyncConfig, initializer: Arc<dyn LocalStoreInitializer>) -> Self {
        let prober = Arc::new(EnvCredentialProber::from_env(config.clone()));
        let remote = Arc::new(S3Transport::new(config.clone()));
        Self::new(config, prober, remote, initializer)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs the credential prober and turns its answer into a [`SyncState`].
    pub async fn probe(&self) -> SyncState {
        match self.prober.probe().await {
            Ok(source) => {
                info!("remote storage credentials found: {source}");
                SyncState::new(true)
            }
            Err(e) => {
                warn!("{e}; running in local-only mode");
                SyncState::local_only()
            }
        }
    }

    /// Brings the local database file into existence at boot.
    ///
    /// Pulls the remote copy if there is one, seeds the remote store with a
    /// fresh database if there is not, and falls back to a local-only
    /// database whenever the remote side fails. Keep the returned state and
    /// pass it to every later [`sync_to_storage`](Self::sync_to_storage).
    pub async fn sync_from_storage(&self) -> SyncResult<StartupReport> {
        ensure_dir(&self.config.data_dir).await?;
        match sweep_staging(&self.config.db_path()).await {
            Ok(0) => {}
            Ok(n) => info!("removed {n} staging file(s) left by an interrupted download"),
            Err(e) => warn!("could not clean staging files: {e}"),
        }

        let state = self.probe().await;
        if !state.remote_available() {
            info!("initializing local database without remote sync");
            let local_ready = self.init_local().await;
            return Ok(StartupReport {
                state,
                outcome: StartupOutcome::LocalOnly,
                local_ready,
            });
        }

        let (outcome, local_ready) = match self.pull_or_seed().await {
            Ok(done) => done,
            Err(e) => {
                warn!("error syncing database from {}: {e}", self.remote.describe());
                info!("initializing new database locally");
                let local_ready = self.init_local().await;
                (
                    StartupOutcome::Fallback {
                        reason: e.to_string(),
                    },
                    local_ready,
                )
            }
        };

        Ok(StartupReport {
            state,
            outcome,
            local_ready,
        })
    }

    /// Uploads the local database file if this process has remote access.
    ///
    /// Never fails and never retries; a failed upload is logged and reported.
    pub async fn sync_to_storage(&self, state: &SyncState) -> PushOutcome {
        if !state.remote_available() {
            return PushOutcome::Skipped;
        }

        let db_path = self.config.db_path();
        if !tokio::fs::try_exists(&db_path).await.unwrap_or(false) {
            warn!("database file not found: {}", db_path.display());
            return PushOutcome::MissingLocalFile;
        }

        match self.remote.upload(&db_path).await {
            Ok(receipt) => {
                info!(
                    "database synced to {} ({} bytes)",
                    self.remote.describe(),
                    receipt.bytes
                );
                receipt.into()
            }
            Err(e) => {
                warn!("error uploading database: {e}");
                PushOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Remote branch of startup. Any error returned here triggers the fallback.
    async fn pull_or_seed(&self) -> SyncResult<(StartupOutcome, bool)> {
        let db_path = self.config.db_path();

        if self.remote.exists().await? {
            info!("downloading database from {}", self.remote.describe());
            let bytes = self.remote.download(&db_path).await?;
            info!("database loaded successfully ({bytes} bytes)");
            return Ok((StartupOutcome::Restored { bytes }, true));
        }

        info!("no existing database found at {}", self.remote.describe());
        info!("initializing new database");
        self.run_initializer().await?;

        let outcome = match self.remote.upload(&db_path).await {
            Ok(receipt) => {
                info!("new database created and uploaded to {}", self.remote.describe());
                StartupOutcome::Seeded {
                    bytes: receipt.bytes,
                    content_hash: receipt.content_hash,
                }
            }
            Err(e) => {
                warn!("new database created but upload failed: {e}");
                StartupOutcome::SeededLocalOnly {
                    reason: e.to_string(),
                }
            }
        };
        Ok((outcome, true))
    }

    /// Runs the initializer and reports whether the local store is usable.
    async fn init_local(&self) -> bool {
        match self.run_initializer().await {
            Ok(()) => true,
            Err(e) => {
                error!("local database initialization failed: {e}");
                false
            }
        }
    }

    async fn run_initializer(&self) -> SyncResult<()> {
        let initializer = Arc::clone(&self.initializer);
        let result = tokio::task::spawn_blocking(move || initializer.init_local_store())
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?;
        result?;
        debug!("local store ready at {}", self.config.db_path().display());
        Ok(())
    }
}
