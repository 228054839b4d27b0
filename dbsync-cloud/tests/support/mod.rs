//! Shared test doubles for sync engine and transport tests.
#![allow(dead_code)]

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_s3::Client as S3Client;
use aws_types::region::Region;
use dbsync_cloud::credential_prober::CredentialProber;
use dbsync_cloud::remote_store::RemoteStore;
use dbsync_cloud::s3_transport::client_from_sdk_config;
use dbsync_cloud::{CredentialSource, SyncConfig, SyncEngine, SyncError, SyncResult, UploadReceipt};
use dbsync_store::fs::{read_snapshot, write_atomic};
use dbsync_store::{LocalStoreInitializer, SqliteStoreInitializer, StoreError, StoreResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const SCHEMA: &str = "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL);";

// ── Config ──────────────────────────────────────────────────────

/// Config rooted in a temp dir, pointing at `endpoint` for S3 calls.
pub fn test_config(data_dir: impl Into<PathBuf>, endpoint: &str) -> SyncConfig {
    SyncConfig {
        bucket: "test-bucket".into(),
        object_key: "inventory.db".into(),
        data_dir: data_dir.into(),
        db_file_name: "inventory.db".into(),
        endpoint_override: Some(endpoint.into()),
        region: "us-east-1".into(),
        credentials_env_var: "DBSYNC_TEST_CREDENTIALS".into(),
    }
}

/// Static-credential S3 client for a wiremock endpoint, retries disabled.
///
/// Goes through the same builder as production so checksum and addressing
/// settings match what a real bucket sees.
pub fn test_s3_client(endpoint: &str) -> S3Client {
    let credentials = aws_credential_types::Credentials::new(
        "dbsync-test",
        "dbsync-test-secret",
        None,
        None,
        "dbsync-test",
    );

    let sdk_config = SdkConfig::builder()
        .region(Region::new("us-east-1"))
        .credentials_provider(SharedCredentialsProvider::new(credentials))
        .retry_config(RetryConfig::disabled())
        .behavior_version(BehaviorVersion::latest())
        .build();

    client_from_sdk_config(&sdk_config, Some(endpoint))
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// ── Prober ──────────────────────────────────────────────────────

/// Prober with a fixed answer that counts how often it is asked.
pub struct StaticProber {
    available: bool,
    pub calls: AtomicUsize,
}

impl StaticProber {
    pub fn available() -> Self {
        Self {
            available: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProber for StaticProber {
    async fn probe(&self) -> SyncResult<CredentialSource> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.available {
            Ok(CredentialSource::ProviderChain)
        } else {
            Err(SyncError::Credential("client construction failed".into()))
        }
    }
}

// ── Remote ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteCall {
    Exists,
    Download,
    Upload,
}

/// In-memory remote blob with per-operation failure switches.
#[derive(Default)]
pub struct MemoryRemote {
    blob: Mutex<Option<Vec<u8>>>,
    calls: Mutex<Vec<RemoteCall>>,
    pub fail_exists: AtomicBool,
    pub fail_download: AtomicBool,
    pub fail_upload: AtomicBool,
}

impl MemoryRemote {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_blob(data: &[u8]) -> Self {
        let remote = Self::default();
        *remote.blob.lock().unwrap() = Some(data.to_vec());
        remote
    }

    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: RemoteCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    fn describe(&self) -> String {
        "memory://test-bucket/inventory.db".into()
    }

    async fn exists(&self) -> SyncResult<bool> {
        self.record(RemoteCall::Exists);
        if self.fail_exists.load(Ordering::SeqCst) {
            return Err(SyncError::RemoteIo("head object failed: 503".into()));
        }
        Ok(self.blob.lock().unwrap().is_some())
    }

    async fn download(&self, destination: &Path) -> SyncResult<u64> {
        self.record(RemoteCall::Download);
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(SyncError::RemoteIo("download failed: connection reset".into()));
        }
        let data = self
            .blob()
            .ok_or_else(|| SyncError::RemoteIo("download failed: NoSuchKey".into()))?;
        write_atomic(destination, &data).await?;
        Ok(data.len() as u64)
    }

    async fn upload(&self, source: &Path) -> SyncResult<UploadReceipt> {
        self.record(RemoteCall::Upload);
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(SyncError::RemoteIo("upload failed: 403 AccessDenied".into()));
        }
        let data = read_snapshot(source).await?;
        let receipt = UploadReceipt {
            bytes: data.len() as u64,
            content_hash: sha256_hex(&data),
        };
        *self.blob.lock().unwrap() = Some(data);
        Ok(receipt)
    }
}

// ── Initializer ─────────────────────────────────────────────────

/// SQLite initializer that counts invocations.
pub struct CountingInitializer {
    inner: SqliteStoreInitializer,
    calls: AtomicUsize,
}

impl CountingInitializer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: SqliteStoreInitializer::new(path).with_schema(SCHEMA),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocalStoreInitializer for CountingInitializer {
    fn init_local_store(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.init_local_store()
    }
}

/// Initializer that always fails.
pub struct BrokenInitializer;

impl LocalStoreInitializer for BrokenInitializer {
    fn init_local_store(&self) -> StoreResult<()> {
        Err(StoreError::InvalidPath("read-only filesystem".into()))
    }
}

// ── Harness ─────────────────────────────────────────────────────

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub config: SyncConfig,
    pub prober: Arc<StaticProber>,
    pub remote: Arc<MemoryRemote>,
    pub initializer: Arc<CountingInitializer>,
    pub engine: SyncEngine,
}

impl Harness {
    pub fn new(prober: StaticProber, remote: MemoryRemote) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().join("data"), "http://127.0.0.1:1");
        let prober = Arc::new(prober);
        let remote = Arc::new(remote);
        let initializer = Arc::new(CountingInitializer::new(config.db_path()));
        let engine = SyncEngine::new(
            config.clone(),
            prober.clone(),
            remote.clone(),
            initializer.clone(),
        );
        Self {
            dir,
            config,
            prober,
            remote,
            initializer,
            engine,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.config.db_path()
    }

    pub fn local_bytes(&self) -> Vec<u8> {
        std::fs::read(self.db_path()).unwrap()
    }
}
