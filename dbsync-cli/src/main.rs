//! # dbsync
//!
//! Keeps a single-file database in an object-storage bucket so an ephemeral
//! instance can restart without losing data.
//!
//! ## Commands
//!
//! - `pull`: Startup sync. Restores the remote copy, seeds the bucket, or
//!   falls back to a local-only database
//! - `push`: Uploads the local database (no-op without credentials)
//! - `probe`: Reports whether remote storage is usable
//!
//! ## Example
//!
//! ```bash
//! # At container start, before the app serves traffic
//! GCS_BUCKET_NAME=my-bucket dbsync pull --schema schema.sql
//!
//! # After the app has written data
//! dbsync push
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dbsync_cloud::SyncConfig;
use std::path::PathBuf;
use tracing::debug;

mod commands;

use commands::{probe, pull, push};

/// Sync a single-file database with object storage.
#[derive(Parser, Debug)]
#[command(name = "dbsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the database file (overrides DBSYNC_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Remote bucket (overrides GCS_BUCKET_NAME)
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// SQL applied when a fresh database has to be created
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Never contact the remote store
    #[arg(long, global = true)]
    offline: bool,

    /// Print the outcome as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bring the local database into existence from the bucket
    Pull,

    /// Upload the local database to the bucket
    Push,

    /// Check whether remote storage credentials are available
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let mut config = SyncConfig::from_env().context("Failed to read configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(bucket) = cli.bucket {
        config.bucket = bucket;
    }

    debug!(
        "database {} <-> {}",
        config.db_path().display(),
        config.remote_uri()
    );

    let schema = match cli.schema {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read schema {}", path.display()))?,
        None => String::new(),
    };

    let engine = commands::build_engine(config, schema, cli.offline);

    match cli.command {
        Commands::Pull => pull::run(&engine, cli.json).await?,
        Commands::Push => push::run(&engine, cli.json).await?,
        Commands::Probe => probe::run(&engine, cli.json).await?,
    }

    Ok(())
}
