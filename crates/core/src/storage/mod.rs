//! Blob store capability shared by both deployment variants.
//!
//! Release packages and model files live in a blob store addressed by
//! slash-separated keys (`releases/...`, `models/...`). Two
//! implementations exist: [`local::LocalBlobStore`] for filesystem-backed
//! deployments and the S3-compatible store in `tontext-cloud`.

pub mod local;

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

/// Errors raised by blob store backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// An object opened for streaming.
pub struct BlobReader {
    /// Size in bytes, when the backend reports it.
    pub len: Option<u64>,
    pub reader: Pin<Box<dyn AsyncRead + Send>>,
}

impl std::fmt::Debug for BlobReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobReader")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Storage backend trait.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// List every key starting with `prefix`. Order is unspecified.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Check whether `key` exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Open the object stored under `key` for streaming.
    async fn open(&self, key: &str) -> Result<BlobReader, StorageError>;

    /// Store `content` under `key`, replacing any previous object.
    async fn put(&self, key: &str, content: Bytes, content_type: &str)
        -> Result<(), StorageError>;

    /// URL the client should be redirected to instead of receiving the
    /// bytes directly, if this backend is fronted by a proxy.
    fn public_url(&self, key: &str) -> Option<String> {
        let _ = key;
        None
    }
}
