//! SQLite-backed local store initializer.

use crate::LocalStoreInitializer;
use crate::error::StoreResult;
use crate::fs::has_content;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Creates a fresh SQLite database file with the application schema.
///
/// A file that already holds data is never opened for writing, so repeated
/// calls (including the orchestrator's last-resort fallback) cannot clobber
/// a database restored earlier in the same boot or left by a previous run.
#[derive(Clone, Debug)]
pub struct SqliteStoreInitializer {
    path: PathBuf,
    schema: String,
    schema_version: i32,
}

impl SqliteStoreInitializer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            schema: String::new(),
            schema_version: 1,
        }
    }

    /// SQL batch applied once when the file is created.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Value written to `PRAGMA user_version` on creation.
    pub fn with_schema_version(mut self, version: i32) -> Self {
        self.schema_version = version;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalStoreInitializer for SqliteStoreInitializer {
    fn init_local_store(&self) -> StoreResult<()> {
        if has_content(&self.path) {
            debug!("{} already populated, leaving it untouched", self.path.display());
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        if !self.schema.trim().is_empty() {
            tx.execute_batch(&self.schema)?;
        }
        tx.pragma_update(None, "user_version", self.schema_version)?;
        tx.commit()?;

        info!(
            "initialized new database at {} (schema version {})",
            self.path.display(),
            self.schema_version
        );
        Ok(())
    }
}
