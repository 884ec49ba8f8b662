//! Latest-release resolution against a [`BlobStore`].

use crate::release::{self, RELEASE_LIST_PREFIX};
use crate::storage::BlobStore;

/// Placeholder version reported when no release is available.
pub const NO_VERSION: &str = "0.0.0";

/// The newest release currently present in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestRelease {
    /// Version token, e.g. `1.2.0`.
    pub version: String,
    /// Full object key, e.g. `releases/tontext-v1.2.0.apk`.
    pub object_key: String,
}

/// Resolve the latest release by listing the store.
///
/// Re-lists on every call. An empty or unreachable store is not an error:
/// listing failures are logged and reported as "no release".
pub async fn resolve_latest(store: &dyn BlobStore) -> Option<LatestRelease> {
    let keys = match store.list(RELEASE_LIST_PREFIX).await {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to list releases");
            return None;
        }
    };

    let object_key = release::pick_latest(keys)?;
    let version = release::extract_version(&object_key)?.to_string();

    Some(LatestRelease {
        version,
        object_key,
    })
}
