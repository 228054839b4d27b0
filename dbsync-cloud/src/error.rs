//! Sync error types.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while probing, transferring, or initializing.
///
/// None of these escape the orchestrator's public operations except a
/// failure to create the local data directory.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote credentials unavailable: {0}")]
    Credential(String),

    #[error("remote I/O failed: {0}")]
    RemoteIo(String),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("local store error: {0}")]
    Store(#[from] dbsync_store::StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

