//! Decides once, at startup, whether remote storage is usable.
//!
//! The answer is cached in the [`SyncState`](crate::types::SyncState) the
//! startup sync returns. It is never re-evaluated, so credential rotation
//! after boot is not picked up; in exchange, a process without credentials
//! makes no further attempts to reach the remote store.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::s3_transport::load_sdk_config;
use crate::types::CredentialSource;
use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials;
use std::path::PathBuf;
use tracing::debug;

#[async_trait]
pub trait CredentialProber: Send + Sync {
    /// Returns where credentials come from, or `SyncError::Credential`.
    async fn probe(&self) -> SyncResult<CredentialSource>;
}

/// Prober backed by the process environment and the SDK provider chain.
pub struct EnvCredentialProber {
    config: SyncConfig,
    explicit: Option<PathBuf>,
}

impl EnvCredentialProber {
    /// Reads the credential-location variable named in `config` now.
    ///
    /// An empty value counts as unset, matching [`SyncConfig::from_env`].
    pub fn from_env(config: SyncConfig) -> Self {
        let explicit = std::env::var_os(&config.credentials_env_var)
            .filter(|value| !value.to_string_lossy().trim().is_empty())
            .map(PathBuf::from);
        Self::new(config, explicit)
    }

    pub fn new(config: SyncConfig, explicit: Option<PathBuf>) -> Self {
        Self { config, explicit }
    }
}

#[async_trait]
impl CredentialProber for EnvCredentialProber {
    async fn probe(&self) -> SyncResult<CredentialSource> {
        // Presence alone is enough; the file is not opened here.
        if let Some(ref location) = self.explicit {
            debug!(
                "{} is set ({}), skipping provider chain",
                self.config.credentials_env_var,
                location.display()
            );
            return Ok(CredentialSource::Explicit(location.clone()));
        }

        let sdk_config = load_sdk_config(&self.config).await;
        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| SyncError::Credential("no credentials provider configured".into()))?;

        provider
            .provide_credentials()
            .await
            .map_err(|e| SyncError::Credential(e.to_string()))?;

        debug!("provider chain resolved credentials");
        Ok(CredentialSource::ProviderChain)
    }
}

/// Prober that always reports no credentials, forcing local-only mode.
pub struct OfflineProber;

#[async_trait]
impl CredentialProber for OfflineProber {
    async fn probe(&self) -> SyncResult<CredentialSource> {
        Err(SyncError::Credential("remote sync disabled".into()))
    }
}
