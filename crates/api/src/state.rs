use std::sync::Arc;

use tontext_core::storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Download ledger connection pool.
    pub pool: tontext_db::DbPool,
    /// Server configuration, including the admin credentials.
    pub config: Arc<ServerConfig>,
    /// Release and model artifact store (local directory or S3 bucket).
    pub store: Arc<dyn BlobStore>,
}
