//! Object-storage persistence for a single-file database.
//!
//! Lets a stateless instance keep its database across restarts by mirroring
//! the file to one blob in an S3-compatible bucket:
//!
//! - Startup pull with seeding and local-only fallback
//! - Best-effort push after mutations
//! - One-shot credential probe cached for the process lifetime
//! - Atomic whole-file transfers (no partial or incremental sync)

pub mod config;
pub mod credential_prober;
pub mod error;
pub mod remote_store;
pub mod s3_transport;
pub mod sync_engine;
pub mod types;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use sync_engine::SyncEngine;
pub use types::*;
