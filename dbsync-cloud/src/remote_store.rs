//! Remote store abstraction for the database blob.
//!
//! Every operation targets the single (bucket, key) pair the store was built
//! for. There is no partial-transfer recovery and no locking: a failed
//! transfer surfaces as one error, and concurrent uploads race with the last
//! writer winning.

use crate::error::SyncResult;
use crate::types::UploadReceipt;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Address of the blob, for log lines.
    fn describe(&self) -> String;

    /// Checks whether the blob exists.
    ///
    /// `Ok(false)` means the store answered "not found". Any other failure is
    /// an error, and callers must treat it as "unknown", never as "absent".
    async fn exists(&self) -> SyncResult<bool>;

    /// Copies the blob to `destination`, returning the number of bytes written.
    ///
    /// `destination` is replaced atomically; on error its previous content is
    /// left untouched.
    async fn download(&self, destination: &Path) -> SyncResult<u64>;

    /// Copies `source` to the blob, creating or overwriting it.
    async fn upload(&self, source: &Path) -> SyncResult<UploadReceipt>;
}
