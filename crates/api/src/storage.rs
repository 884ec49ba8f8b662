//! Blob store construction from configuration.

use std::sync::Arc;

use tontext_cloud::S3BlobStore;
use tontext_core::storage::local::LocalBlobStore;
use tontext_core::storage::{BlobStore, StorageError};

use crate::config::StorageConfig;

/// Build and bootstrap the configured blob store.
///
/// The S3 variant verifies (or creates) its bucket; the local variant
/// creates its directory layout. Either failure aborts startup.
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    match config {
        StorageConfig::S3(s3) => {
            let store = S3BlobStore::connect(s3.clone()).await;
            store.ensure_bucket().await?;
            Ok(Arc::new(store))
        }
        StorageConfig::Local { root } => {
            let store = LocalBlobStore::new(root);
            store.ensure_layout().await?;
            tracing::info!(root = %root.display(), "Local blob store ready");
            Ok(Arc::new(store))
        }
    }
}
