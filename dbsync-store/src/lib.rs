//! Local storage layer for dbsync.
//!
//! Owns everything that touches the on-disk database file without talking
//! to the remote store:
//!
//! - [`LocalStoreInitializer`], the hook the sync orchestrator calls when no
//!   usable copy of the database exists anywhere
//! - [`SqliteStoreInitializer`], a non-destructive SQLite implementation
//! - [`fs`] helpers for idempotent directory creation and atomic replace

mod error;
pub mod fs;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteStoreInitializer;

/// Creates the database file with an empty/default schema.
///
/// Implementations must be idempotent and non-destructive: calling this when
/// the database file already holds data must leave that data intact. The
/// orchestrator calls it on every fallback path without checking first.
pub trait LocalStoreInitializer: Send + Sync {
    fn init_local_store(&self) -> StoreResult<()>;
}
