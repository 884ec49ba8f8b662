//! Handlers for release discovery, download, and upload.

use axum::extract::{Multipart, State};
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tontext_core::hashing::client_ip_hash;
use tontext_core::release::{self, APK_CONTENT_TYPE};
use tontext_core::resolver::{self, NO_VERSION};
use tontext_db::models::download::CreateDownloadEvent;
use tontext_db::repositories::DownloadRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::delivery;
use crate::middleware::admin::RequireAdmin;
use crate::middleware::client_addr::ClientAddr;
use crate::state::AppState;

/// Multipart field carrying the uploaded package.
const UPLOAD_FIELD: &str = "file";

/// Response for `GET /api/version`.
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub available: bool,
}

/// Response for `POST /api/releases/upload`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub version: String,
    pub object: String,
}

/// GET /api/version -- latest available version, always 200.
pub async fn latest_version(State(state): State<AppState>) -> Json<VersionResponse> {
    let response = match resolver::resolve_latest(state.store.as_ref()).await {
        Some(latest) => VersionResponse {
            version: latest.version,
            available: true,
        },
        None => VersionResponse {
            version: NO_VERSION.to_string(),
            available: false,
        },
    };
    Json(response)
}

/// GET /api/download/latest -- record a download, then deliver the package.
///
/// The ledger row is committed before any byte of the response is sent.
pub async fn download_latest(
    State(state): State<AppState>,
    ClientAddr(client_addr): ClientAddr,
    headers: HeaderMap,
) -> AppResult<Response> {
    let latest = resolver::resolve_latest(state.store.as_ref())
        .await
        .ok_or_else(|| AppError::not_found("No release available"))?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let event = DownloadRepo::record(
        &state.pool,
        &CreateDownloadEvent {
            version: latest.version.clone(),
            ip_hash: client_ip_hash(client_addr.as_deref()),
            user_agent,
        },
    )
    .await?;

    tracing::info!(
        event_id = event.id,
        version = %event.version,
        ip_hash = %event.ip_hash,
        "Recorded download"
    );

    delivery::deliver(
        state.store.as_ref(),
        &latest.object_key,
        &release::release_filename(&latest.version),
        APK_CONTENT_TYPE,
    )
    .await
}

/// POST /api/releases/upload -- store a new release package (admin only).
pub async fn upload_release(
    admin: RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid file: {e}")))?;
        upload = Some((filename, content));
    }

    let (filename, content) =
        upload.ok_or_else(|| AppError::BadRequest(format!("Missing '{UPLOAD_FIELD}' field")))?;
    let filename = release::validate_release_filename(filename.as_deref())?;

    let object_key = release::release_object_key(filename);
    let size = content.len();
    state
        .store
        .put(&object_key, content, APK_CONTENT_TYPE)
        .await?;

    tracing::info!(
        admin = %admin.username,
        object = %object_key,
        size,
        "Uploaded release"
    );

    Ok(Json(UploadResponse {
        status: "ok",
        version: release::upload_version(filename).to_string(),
        object: object_key,
    }))
}
