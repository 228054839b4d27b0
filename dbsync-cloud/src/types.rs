//! Shared types for sync operations.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Where the credential prober found usable credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// The credential-location variable is set; its content is not checked.
    Explicit(PathBuf),
    /// The SDK provider chain resolved credentials.
    ProviderChain,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Explicit(path) => write!(f, "explicit ({})", path.display()),
            CredentialSource::ProviderChain => write!(f, "provider chain"),
        }
    }
}

/// Operating mode chosen at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    Remote,
    LocalOnly,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Remote => write!(f, "remote"),
            SyncMode::LocalOnly => write!(f, "local-only"),
        }
    }
}

/// Process-wide sync state, derived once by the startup sync.
///
/// There is no way to flip `remote_available` after construction: a process
/// that started local-only stays local-only, and a remote-capable state is
/// never re-probed before an upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SyncState {
    remote_available: bool,
}

impl SyncState {
    pub(crate) fn new(remote_available: bool) -> Self {
        Self { remote_available }
    }

    /// A state in which every push is a no-op.
    pub fn local_only() -> Self {
        Self::new(false)
    }

    pub fn remote_available(&self) -> bool {
        self.remote_available
    }

    pub fn mode(&self) -> SyncMode {
        if self.remote_available {
            SyncMode::Remote
        } else {
            SyncMode::LocalOnly
        }
    }
}

/// Result of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub bytes: u64,
    /// Hex-encoded SHA-256 of the uploaded bytes.
    pub content_hash: String,
}

/// How the startup sync produced the local database file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartupOutcome {
    /// The remote copy was downloaded.
    Restored { bytes: u64 },
    /// No remote copy existed; a fresh store was created and uploaded.
    Seeded { bytes: u64, content_hash: String },
    /// No remote copy existed; a fresh store was created but the upload failed.
    SeededLocalOnly { reason: String },
    /// No credentials; the remote store was never contacted.
    LocalOnly,
    /// The existence check or download failed; the local store was initialized instead.
    Fallback { reason: String },
}

impl StartupOutcome {
    /// True if the local file now mirrors the remote blob.
    pub fn in_sync_with_remote(&self) -> bool {
        matches!(
            self,
            StartupOutcome::Restored { .. } | StartupOutcome::Seeded { .. }
        )
    }
}

/// Returned by the startup sync.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StartupReport {
    pub state: SyncState,
    pub outcome: StartupOutcome,
    /// False only if the local store initializer itself failed.
    pub local_ready: bool,
}

/// Result of an on-demand push.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PushOutcome {
    /// Remote unavailable for this process; nothing attempted.
    Skipped,
    /// The local database file does not exist.
    MissingLocalFile,
    Uploaded { bytes: u64, content_hash: String },
    Failed { reason: String },
}

impl From<UploadReceipt> for PushOutcome {
    fn from(receipt: UploadReceipt) -> Self {
        PushOutcome::Uploaded {
            bytes: receipt.bytes,
            content_hash: receipt.content_hash,
        }
    }
}
