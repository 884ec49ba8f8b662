//! Handler for on-device model files.

use axum::extract::{Path, State};
use axum::response::Response;
use tontext_core::release::{self, MODEL_CONTENT_TYPE};

use crate::error::{AppError, AppResult};
use crate::handlers::delivery;
use crate::state::AppState;

const MODEL_NOT_FOUND: &str = "Model not found";

/// GET /api/model/{filename} -- deliver a `.bin` model file.
///
/// Wrong extensions, missing objects, and store errors all answer 404.
/// Model fetches are not recorded in the ledger.
pub async fn serve_model(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let key =
        release::model_object_key(&filename).ok_or_else(|| AppError::not_found(MODEL_NOT_FOUND))?;

    match state.store.exists(&key).await {
        Ok(true) => {}
        Ok(false) => return Err(AppError::not_found(MODEL_NOT_FOUND)),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Model existence check failed");
            return Err(AppError::not_found(MODEL_NOT_FOUND));
        }
    }

    delivery::deliver(state.store.as_ref(), &key, &filename, MODEL_CONTENT_TYPE).await
}
