//! Filesystem storage backend.

use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::{BlobReader, BlobStore, StorageError};
use crate::release::{MODELS_DIR, RELEASES_DIR};

/// Filesystem-based storage backend.
///
/// Keys map to paths relative to `root`, so `releases/tontext-v1.apk`
/// lives at `<root>/releases/tontext-v1.apk`. Objects are never
/// redirected; handlers stream them directly.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the `releases/` and `models/` directories under the root.
    pub async fn ensure_layout(&self) -> Result<(), StorageError> {
        for dir in [RELEASES_DIR, MODELS_DIR] {
            fs::create_dir_all(self.root.join(dir)).await?;
        }
        Ok(())
    }

    /// Resolve a key to a path, refusing anything that could escape the root.
    fn key_to_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && !key.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    /// Listing is one directory level deep: the part of `prefix` up to
    /// the last `/` selects the directory, the rest filters file names.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let (dir, name_prefix) = match prefix.rfind('/') {
            Some(idx) => (&prefix[..=idx], &prefix[idx + 1..]),
            None => ("", prefix),
        };
        let dir_path = if dir.is_empty() {
            self.root.clone()
        } else {
            self.key_to_path(dir.trim_end_matches('/'))?
        };

        let mut entries = match fs::read_dir(&dir_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with(name_prefix) {
                keys.push(format!("{dir}{name}"));
            }
        }
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.key_to_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn open(&self, key: &str) -> Result<BlobReader, StorageError> {
        let path = self.key_to_path(key)?;
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();
        Ok(BlobReader {
            len: Some(len),
            reader: Box::pin(file),
        })
    }

    /// Writes to an anonymous temporary file in the target directory and
    /// renames it into place, so a concurrent listing never sees a
    /// half-written package. The temporary file is removed on failure.
    async fn put(
        &self,
        key: &str,
        content: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let path = self.key_to_path(key)?;
        let Some(parent) = path.parent().map(Path::to_path_buf) else {
            return Err(StorageError::InvalidKey(key.to_string()));
        };
        fs::create_dir_all(&parent).await?;

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut staging = tempfile::NamedTempFile::new_in(&parent)?;
            staging.write_all(&content)?;
            staging.as_file().sync_all()?;
            staging.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::Backend(format!("Write task failed: {e}")))??;
        Ok(())
    }
}
