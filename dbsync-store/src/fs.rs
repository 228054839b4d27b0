//! Filesystem helpers for the local database file.
//!
//! The database file is replaced as a whole, never patched in place: new
//! content is written to a hidden sibling, synced to disk, and renamed over
//! the target. Readers therefore see either the complete old file or the
//! complete new one.

use crate::error::{StoreError, StoreResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Creates `dir` and any missing parents. Succeeds if it already exists.
pub async fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}

/// Returns true if `path` is a regular file with at least one byte.
pub fn has_content(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

/// Reads the whole file in one pass so the caller holds a single snapshot.
pub async fn read_snapshot(path: &Path) -> StoreResult<Vec<u8>> {
    Ok(tokio::fs::read(path).await?)
}

/// Hidden sibling of `path` used to stage a replacement.
///
/// Lives in the same directory so the final rename never crosses a
/// filesystem boundary.
pub fn staging_path(path: &Path) -> StoreResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidPath(path.display().to_string()))?;

    let mut staged = OsString::from(".");
    staged.push(name);
    staged.push(format!(".{}.part", Uuid::new_v4().simple()));
    Ok(path.with_file_name(staged))
}

/// Removes staging files for `path` left behind by an interrupted write.
///
/// Must not run while a [`write_atomic`] on the same path is in flight.
/// Returns how many files were removed. A missing directory counts as clean.
pub async fn sweep_staging(path: &Path) -> StoreResult<usize> {
    let name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidPath(path.display().to_string()))?;
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };

    let mut prefix = OsString::from(".");
    prefix.push(name);
    prefix.push(".");
    let prefix = prefix.to_string_lossy().into_owned();

    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if !(file_name.starts_with(&prefix) && file_name.ends_with(".part")) {
            continue;
        }
        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => {
                debug!("removed stale staging file {}", entry.path().display());
                removed += 1;
            }
            Err(e) => warn!("failed to remove stale staging file {}: {e}", entry.path().display()),
        }
    }
    Ok(removed)
}

/// Atomically replaces the contents of `path` with `bytes`.
///
/// On failure the staging file is removed and `path` is left as it was.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let staged = staging_path(path)?;

    if let Err(e) = stage_and_rename(&staged, path, bytes).await {
        if let Err(cleanup) = tokio::fs::remove_file(&staged).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to remove staging file {}: {cleanup}", staged.display());
            }
        }
        return Err(e.into());
    }

    debug!("replaced {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

async fn stage_and_rename(staged: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(staged).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(staged, target).await?;
    sync_parent(target).await
}

/// Flushes the directory entry created by the rename.
#[cfg(unix)]
async fn sync_parent(target: &Path) -> std::io::Result<()> {
    let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::File::open(parent).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_parent(_target: &Path) -> std::io::Result<()> {
    Ok(())
}
