//! Artifact delivery: redirect to the storage proxy or stream directly.

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tontext_core::storage::BlobStore;

use crate::error::{AppError, AppResult};

/// Deliver the object stored under `key`.
///
/// Stores with a public URL answer `302 Found`; the proxy behind that URL
/// supplies the file name and content type. Otherwise the object is
/// streamed with `Content-Disposition: attachment; filename="<filename>"`
/// and, when the store knows it, a `Content-Length`.
pub async fn deliver(
    store: &dyn BlobStore,
    key: &str,
    filename: &str,
    content_type: &str,
) -> AppResult<Response> {
    if let Some(url) = store.public_url(key) {
        return Response::builder()
            .status(StatusCode::FOUND)
            .header(LOCATION, url)
            .body(Body::empty())
            .map_err(|e| AppError::InternalError(format!("Failed to build redirect: {e}")));
    }

    let blob = store.open(key).await?;

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        );
    if let Some(len) = blob.len {
        response = response.header(CONTENT_LENGTH, len);
    }

    response
        .body(Body::from_stream(ReaderStream::new(blob.reader)))
        .map_err(|e| AppError::InternalError(format!("Failed to build response: {e}")))
}
