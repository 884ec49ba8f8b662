//! Tests for `AppError` -> HTTP response mapping.
//!
//! Each variant is converted through `IntoResponse` directly; no router is
//! involved.

use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use tontext_api::error::AppError;
use tontext_core::error::CoreError;
use tontext_core::storage::StorageError;

/// Helper: convert an `AppError` into its status code, headers and JSON body.
async fn error_to_response(
    err: AppError,
) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, headers, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, _, json) = error_to_response(AppError::not_found("No release available")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "No release available");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("Missing 'file' field".into());

    let (status, _, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Missing 'file' field");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("File must be an .apk".into()));

    let (status, _, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "File must be an .apk");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Unauthorized maps to 401 with a Basic challenge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_error_returns_401_with_challenge() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let (status, headers, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers[WWW_AUTHENTICATE], "Basic");
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid credentials");
}

// ---------------------------------------------------------------------------
// Test: non-401 errors carry no challenge header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn other_errors_have_no_challenge() {
    let (_, headers, _) = error_to_response(AppError::not_found("Model not found")).await;
    assert!(headers.get(WWW_AUTHENTICATE).is_none());
}

// ---------------------------------------------------------------------------
// Test: a vanished object maps to 404 without exposing the key
// ---------------------------------------------------------------------------

#[tokio::test]
async fn storage_not_found_returns_404() {
    let err = AppError::Storage(StorageError::NotFound("releases/tontext-v1.apk".into()));

    let (status, _, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Object not found");
}

// ---------------------------------------------------------------------------
// Test: internal failures are sanitized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_errors_return_500_and_sanitize_message() {
    let errors = [
        AppError::InternalError("secret path /var/lib/tontext".into()),
        AppError::Storage(StorageError::Backend("secret endpoint minio:9000".into())),
        AppError::Database(sqlx::Error::PoolTimedOut),
    ];

    for err in errors {
        let (status, _, json) = error_to_response(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
        assert!(
            !json.to_string().contains("secret"),
            "Internal error response must not leak sensitive details"
        );
    }
}
