//! Download ledger entity model, DTOs, and aggregate views.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use tontext_core::types::{DbId, Timestamp};

/// A row from the `downloads` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DownloadEvent {
    pub id: DbId,
    pub version: String,
    pub downloaded_at: Timestamp,
    pub ip_hash: String,
    pub user_agent: String,
}

/// DTO for appending a download event.
#[derive(Debug, Clone)]
pub struct CreateDownloadEvent {
    pub version: String,
    pub ip_hash: String,
    pub user_agent: String,
}

/// Per-version download totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VersionStats {
    pub version: String,
    pub count: i64,
    pub first_seen: Timestamp,
    pub last_seen: Timestamp,
}

/// Downloads on one server-local calendar day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Aggregate ledger statistics, read from a single snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total: i64,
    pub today: i64,
    pub unique_ips: i64,
    /// Ordered by `first_seen` descending.
    pub per_version: Vec<VersionStats>,
    /// Last 30 days, non-empty days only, newest first.
    pub daily: Vec<DailyCount>,
}

impl StatsSnapshot {
    /// Largest daily count, or 1 when there are no days (bar-chart scale).
    pub fn max_daily(&self) -> i64 {
        self.daily.iter().map(|d| d.count).max().unwrap_or(1).max(1)
    }
}
