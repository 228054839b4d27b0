//! S3-compatible transport for the database blob.
//!
//! Talks to any S3 XML API endpoint (GCS interoperability by default) with
//! path-style addressing. The client is built lazily on first use, so a
//! process that never syncs never resolves credentials or opens a socket.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::remote_store::RemoteStore;
use crate::types::UploadReceipt;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{RequestChecksumCalculation, ResponseChecksumValidation};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_types::region::Region;
use dbsync_store::fs::{read_snapshot, write_atomic};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::sync::OnceCell;
use tracing::debug;

/// Loads the shared SDK configuration: provider chain, region, retry defaults.
pub async fn load_sdk_config(config: &SyncConfig) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await
}

/// Builds an S3 client from SDK configuration and an optional endpoint.
///
/// Checksums are only sent or verified when an operation requires them;
/// GCS rejects the streaming checksum trailers newer SDKs add by default.
pub fn client_from_sdk_config(sdk_config: &SdkConfig, endpoint: Option<&str>) -> S3Client {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config)
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired);

    if let Some(endpoint) = endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    S3Client::from_conf(builder.build())
}

/// S3 transport for the database blob.
pub struct S3Transport {
    config: SyncConfig,
    client: OnceCell<S3Client>,
}

impl S3Transport {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Uses a pre-built client instead of loading one from the environment.
    pub fn with_client(config: SyncConfig, client: S3Client) -> Self {
        Self {
            config,
            client: OnceCell::from(client),
        }
    }

    async fn client(&self) -> &S3Client {
        self.client
            .get_or_init(|| async {
                let sdk_config = load_sdk_config(&self.config).await;
                debug!(
                    "built S3 client for {} (endpoint {:?})",
                    self.config.remote_uri(),
                    self.config.endpoint_override
                );
                client_from_sdk_config(&sdk_config, self.config.endpoint_override.as_deref())
            })
            .await
    }

    fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn key(&self) -> &str {
        &self.config.object_key
    }
}

#[async_trait]
impl RemoteStore for S3Transport {
    fn describe(&self) -> String {
        self.config.remote_uri()
    }

    async fn exists(&self) -> SyncResult<bool> {
        let client = self.client().await;

        match client
            .head_object()
            .bucket(self.bucket())
            .key(self.key())
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(SyncError::RemoteIo(format!(
                        "head object failed for {}: {}",
                        self.describe(),
                        DisplayErrorContext(&service_err)
                    )))
                }
            }
        }
    }

    async fn download(&self, destination: &Path) -> SyncResult<u64> {
        let client = self.client().await;

        let resp = client
            .get_object()
            .bucket(self.bucket())
            .key(self.key())
            .send()
            .await
            .map_err(|e| {
                SyncError::RemoteIo(format!(
                    "download failed for {}: {}",
                    self.describe(),
                    DisplayErrorContext(&e)
                ))
            })?;

        let body = resp.body.collect().await.map_err(|e| {
            SyncError::RemoteIo(format!("failed to read body for {}: {e}", self.describe()))
        })?;

        let bytes = body.into_bytes();
        write_atomic(destination, &bytes).await?;

        debug!(
            "downloaded {} bytes from {} to {}",
            bytes.len(),
            self.describe(),
            destination.display()
        );
        Ok(bytes.len() as u64)
    }

    async fn upload(&self, source: &Path) -> SyncResult<UploadReceipt> {
        let data = read_snapshot(source).await?;
        let receipt = UploadReceipt {
            bytes: data.len() as u64,
            content_hash: hex::encode(Sha256::digest(&data)),
        };

        let client = self.client().await;
        client
            .put_object()
            .bucket(self.bucket())
            .key(self.key())
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                SyncError::RemoteIo(format!(
                    "upload failed for {}: {}",
                    self.describe(),
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(
            "uploaded {} bytes to {} (sha256 {})",
            receipt.bytes,
            self.describe(),
            receipt.content_hash
        );
        Ok(receipt)
    }
}
