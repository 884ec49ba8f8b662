//! Repository for the `downloads` table.

use chrono::{Days, NaiveDate, Utc};
use tontext_core::types::Timestamp;

use crate::models::download::{
    CreateDownloadEvent, DailyCount, DownloadEvent, StatsSnapshot, VersionStats,
};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, version, downloaded_at, ip_hash, user_agent";

/// Number of days before today covered by the daily breakdown.
pub const DAILY_WINDOW_DAYS: u64 = 30;

/// Server-local calendar date of a stored timestamp.
const LOCAL_DAY: &str = "date(downloaded_at, 'localtime')";

/// Append-only access to the download ledger plus its aggregates.
pub struct DownloadRepo;

impl DownloadRepo {
    /// Append a download event stamped with the current time.
    ///
    /// The row is committed before this returns.
    pub async fn record(
        pool: &DbPool,
        input: &CreateDownloadEvent,
    ) -> Result<DownloadEvent, sqlx::Error> {
        Self::record_at(pool, input, Utc::now()).await
    }

    /// Append a download event with an explicit timestamp.
    pub async fn record_at(
        pool: &DbPool,
        input: &CreateDownloadEvent,
        downloaded_at: Timestamp,
    ) -> Result<DownloadEvent, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO downloads (version, downloaded_at, ip_hash, user_agent)
             VALUES (?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, DownloadEvent>(&query)
            .bind(&input.version)
            .bind(downloaded_at)
            .bind(&input.ip_hash)
            .bind(&input.user_agent)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(event)
    }

    /// List events for one version, oldest first.
    ///
    /// Ledger inspection helper; no endpoint exposes raw events.
    pub async fn list_by_version(
        pool: &DbPool,
        version: &str,
    ) -> Result<Vec<DownloadEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM downloads WHERE version = ? ORDER BY downloaded_at, id"
        );
        sqlx::query_as::<_, DownloadEvent>(&query)
            .bind(version)
            .fetch_all(pool)
            .await
    }

    /// Count every event in the ledger.
    ///
    /// Ledger inspection helper; `stats` computes its own total inside
    /// the snapshot transaction.
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM downloads")
            .fetch_one(pool)
            .await
    }

    /// Compute the aggregate statistics relative to the server-local date
    /// `today`.
    ///
    /// All figures are read inside one transaction so a concurrent insert
    /// cannot split the snapshot.
    pub async fn stats(pool: &DbPool, today: NaiveDate) -> Result<StatsSnapshot, sqlx::Error> {
        let window_start = today
            .checked_sub_days(Days::new(DAILY_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);

        let mut tx = pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM downloads")
            .fetch_one(&mut *tx)
            .await?;

        let today_count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM downloads WHERE {LOCAL_DAY} = ?"))
                .bind(today)
                .fetch_one(&mut *tx)
                .await?;

        let unique_ips: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT ip_hash) FROM downloads")
            .fetch_one(&mut *tx)
            .await?;

        let per_version = sqlx::query_as::<_, VersionStats>(
            "SELECT version,
                    COUNT(*) AS count,
                    MIN(downloaded_at) AS first_seen,
                    MAX(downloaded_at) AS last_seen
             FROM downloads
             GROUP BY version
             ORDER BY first_seen DESC",
        )
        .fetch_all(&mut *tx)
        .await?;

        let daily = sqlx::query_as::<_, DailyCount>(&format!(
            "SELECT {LOCAL_DAY} AS day, COUNT(*) AS count
             FROM downloads
             WHERE {LOCAL_DAY} >= ? AND {LOCAL_DAY} <= ?
             GROUP BY day
             ORDER BY day DESC"
        ))
        .bind(window_start)
        .bind(today)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StatsSnapshot {
            total,
            today: today_count,
            unique_ips,
            per_version,
            daily,
        })
    }
}
