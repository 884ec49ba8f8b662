//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// `ok`, or `degraded` when the ledger is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthStatus {
    fn from_db(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// GET /health -- always 200; the ledger state is reported in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let db_healthy = tontext_db::health_check(&state.pool).await.is_ok();
    Json(HealthStatus::from_db(db_healthy))
}
