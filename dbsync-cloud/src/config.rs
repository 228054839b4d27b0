//! Sync configuration.

use crate::error::{SyncError, SyncResult};
use std::path::PathBuf;

/// Environment variable naming the remote bucket.
pub const BUCKET_ENV: &str = "GCS_BUCKET_NAME";
pub const OBJECT_KEY_ENV: &str = "DBSYNC_OBJECT_KEY";
pub const DATA_DIR_ENV: &str = "DBSYNC_DATA_DIR";
pub const ENDPOINT_ENV: &str = "DBSYNC_ENDPOINT";
pub const REGION_ENV: &str = "DBSYNC_REGION";

/// Configuration for the database sync subsystem.
///
/// The local path and remote key are fixed for the life of the process;
/// neither sync operation takes them as arguments.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Remote bucket name.
    pub bucket: String,

    /// Object key of the database blob inside the bucket.
    pub object_key: String,

    /// Local directory holding the database file.
    pub data_dir: PathBuf,

    /// File name of the database inside `data_dir`.
    pub db_file_name: String,

    /// S3-compatible endpoint. Defaults to the GCS interoperability API.
    pub endpoint_override: Option<String>,

    /// Signing region for the endpoint.
    pub region: String,

    /// Environment variable whose presence marks explicit credentials.
    pub credentials_env_var: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bucket: "inventory-slawburger".to_string(),
            object_key: "inventory.db".to_string(),
            data_dir: PathBuf::from("data"),
            db_file_name: "inventory.db".to_string(),
            endpoint_override: Some("https://storage.googleapis.com".to_string()),
            region: "auto".to_string(),
            credentials_env_var: "AWS_SHARED_CREDENTIALS_FILE".to_string(),
        }
    }
}

impl SyncConfig {
    /// Builds a config from defaults overridden by process environment.
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults overridden by `lookup`.
    ///
    /// A variable that is present but empty is rejected rather than
    /// silently replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> SyncResult<Option<String>> {
            match lookup(key) {
                Some(value) if value.trim().is_empty() => {
                    Err(SyncError::Config(format!("{key} is set but empty")))
                }
                other => Ok(other),
            }
        };

        let mut config = Self::default();
        if let Some(bucket) = get(BUCKET_ENV)? {
            config.bucket = bucket;
        }
        if let Some(key) = get(OBJECT_KEY_ENV)? {
            config.object_key = key;
        }
        if let Some(dir) = get(DATA_DIR_ENV)? {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(endpoint) = get(ENDPOINT_ENV)? {
            config.endpoint_override = Some(endpoint);
        }
        if let Some(region) = get(REGION_ENV)? {
            config.region = region;
        }
        Ok(config)
    }

    /// Full path of the local database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// Human-readable address of the remote blob, for log lines.
    pub fn remote_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.object_key)
    }

    /// Creates a config for testing against a local S3 double.
    #[cfg(test)]
    pub fn test(endpoint: &str, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            bucket: "test-bucket".to_string(),
            object_key: "inventory.db".to_string(),
            data_dir: data_dir.into(),
            db_file_name: "inventory.db".to_string(),
            endpoint_override: Some(endpoint.to_string()),
            region: "us-east-1".to_string(),
            credentials_env_var: "DBSYNC_TEST_CREDENTIALS".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_joins_dir_and_file() {
        let config = SyncConfig::test("http://localhost:9000", "/tmp/x");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/x/inventory.db"));
    }

    #[test]
    fn remote_uri_names_bucket_and_key() {
        let config = SyncConfig::test("http://localhost:9000", "data");
        assert_eq!(config.remote_uri(), "s3://test-bucket/inventory.db");
    }
}
