//! S3-compatible storage backend.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tontext_core::storage::{BlobReader, BlobStore, StorageError};

/// Connection settings for an S3-compatible endpoint.
#[derive(Clone)]
pub struct S3Config {
    /// Endpoint URL. A bare `host:port` gets `http://` prepended.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Prefix of the proxy URL clients are redirected to, e.g. `/storage`.
    pub public_base_url: String,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

/// Prepend `http://` to endpoints given as bare `host:port`.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

/// Build the public-read bucket policy applied when the bucket is created.
pub fn public_read_policy(bucket: &str) -> serde_json::Value {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {"AWS": ["*"]},
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }],
    })
}

/// S3-compatible storage backend.
///
/// Downloads are never proxied through this service: [`BlobStore::public_url`]
/// points clients at the reverse proxy that fronts the bucket.
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    /// Build a client for the configured endpoint using static credentials
    /// and path-style addressing (required by MinIO).
    pub async fn connect(config: S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key,
            config.secret_key,
            None,
            None,
            "tontext-static",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .endpoint_url(normalize_endpoint(&config.endpoint))
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        tracing::info!(bucket = %config.bucket, "S3 blob store configured");

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket,
            public_base_url: config.public_base_url,
        }
    }

    /// Create the bucket with a public-read policy if it does not exist yet.
    pub async fn ensure_bucket(&self) -> Result<(), StorageError> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }

        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| backend_error("create bucket", &self.bucket, e))?;

        self.client
            .put_bucket_policy()
            .bucket(&self.bucket)
            .policy(public_read_policy(&self.bucket).to_string())
            .send()
            .await
            .map_err(|e| backend_error("set policy on", &self.bucket, e))?;

        tracing::info!(bucket = %self.bucket, "Created bucket with public-read policy");
        Ok(())
    }
}

fn backend_error<E>(action: &str, target: &str, err: E) -> StorageError
where
    E: std::error::Error,
{
    StorageError::Backend(format!(
        "Failed to {action} '{target}': {}",
        DisplayErrorContext(err)
    ))
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| backend_error("list", prefix, e))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|obj| obj.key())
                    .map(str::to_string),
            );
        }

        tracing::debug!(prefix, count = keys.len(), "S3 list objects successful");
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(backend_error("stat", key, e)),
        }
    }

    async fn open(&self, key: &str) -> Result<BlobReader, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(backend_error("get", key, e)),
        };

        let len = output
            .content_length()
            .and_then(|len| u64::try_from(len).ok());
        Ok(BlobReader {
            len,
            reader: Box::pin(output.body.into_async_read()),
        })
    }

    async fn put(
        &self,
        key: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = content.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|e| backend_error("put", key, e))?;

        tracing::debug!(key, size, "S3 put object successful");
        Ok(())
    }

    fn public_url(&self, key: &str) -> Option<String> {
        Some(format!(
            "{}/{key}",
            self.public_base_url.trim_end_matches('/')
        ))
    }
}
