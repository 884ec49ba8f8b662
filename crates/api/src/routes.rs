//! Route tables.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{health, models, releases, stats};
use crate::state::AppState;

/// Largest accepted release upload.
pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Routes mounted at the root, outside `/api`.
///
/// ```text
/// /health                                          service + ledger health (public)
/// /admin                                           HTML dashboard (admin)
/// ```
pub fn root_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/admin", get(stats::admin_page))
}

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /version                                         latest version (public)
/// /download/latest                                 record + deliver latest APK (public)
/// /model/{filename}                                deliver a .bin model (public)
/// /releases/upload                                 multipart APK upload (admin)
/// /stats                                           aggregate statistics (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/version", get(releases::latest_version))
        .route("/download/latest", get(releases::download_latest))
        .route("/model/{filename}", get(models::serve_model))
        .route(
            "/releases/upload",
            post(releases::upload_release).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/stats", get(stats::api_stats))
}
