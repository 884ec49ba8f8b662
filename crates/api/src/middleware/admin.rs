//! HTTP Basic admin authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use base64::Engine;
use tontext_core::error::CoreError;

use crate::config::AdminCredentials;
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured admin credentials.
///
/// Extractors run before the handler body, so a rejected request never
/// touches the ledger or the blob store:
///
/// ```ignore
/// async fn admin_only(_admin: RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    pub username: String,
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) = extract_basic_credentials(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })?;

        if !credentials_match(&state.config.admin, &username, &password) {
            tracing::warn!(username = %username, "Rejected admin credentials");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid credentials".into(),
            )));
        }

        Ok(RequireAdmin { username })
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
pub fn extract_basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic ").or(v.strip_prefix("basic ")))
        .and_then(|b64| base64::engine::general_purpose::STANDARD.decode(b64.trim()).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|s| {
            let (user, pass) = s.split_once(':')?;
            Some((user.to_string(), pass.to_string()))
        })
}

/// Plain equality against the configured pair.
fn credentials_match(expected: &AdminCredentials, username: &str, password: &str) -> bool {
    expected.username == username && expected.password == password
}
