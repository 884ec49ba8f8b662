//! Admin statistics: JSON snapshot and HTML dashboard.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use chrono::Local;
use tontext_db::models::download::StatsSnapshot;
use tontext_db::repositories::DownloadRepo;

use crate::error::AppResult;
use crate::middleware::admin::RequireAdmin;
use crate::state::AppState;

/// Read the ledger aggregates relative to the server-local date.
async fn load_stats(state: &AppState) -> AppResult<StatsSnapshot> {
    let stats = DownloadRepo::stats(&state.pool, Local::now().date_naive()).await?;
    Ok(stats)
}

/// GET /api/stats -- aggregate download statistics (admin only).
pub async fn api_stats(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<StatsSnapshot>> {
    Ok(Json(load_stats(&state).await?))
}

/// GET /admin -- HTML dashboard over the same aggregates (admin only).
pub async fn admin_page(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Html<String>> {
    let stats = load_stats(&state).await?;
    Ok(Html(render_dashboard(&stats)))
}

/// Render the dashboard page. All interpolated text is HTML-escaped.
pub fn render_dashboard(stats: &StatsSnapshot) -> String {
    let mut versions = String::new();
    for v in &stats.per_version {
        versions.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&v.version),
            v.count,
            v.first_seen.format("%Y-%m-%d %H:%M"),
            v.last_seen.format("%Y-%m-%d %H:%M"),
        ));
    }
    if stats.per_version.is_empty() {
        versions.push_str("<tr><td colspan=\"4\">No downloads yet</td></tr>\n");
    }

    let max_daily = stats.max_daily();
    let mut daily = String::new();
    for d in &stats.daily {
        let width = d.count * 100 / max_daily;
        daily.push_str(&format!(
            "<div class=\"day\"><span class=\"label\">{}</span>\
             <span class=\"bar\" style=\"width: {width}%\"></span>\
             <span class=\"count\">{}</span></div>\n",
            d.day, d.count,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Tontext Admin</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem; color: #222; }}
.cards {{ display: flex; gap: 1rem; }}
.card {{ border: 1px solid #ddd; border-radius: 8px; padding: 1rem 1.5rem; }}
.card .value {{ font-size: 2rem; font-weight: 600; }}
table {{ border-collapse: collapse; margin-top: 1rem; }}
td, th {{ border-bottom: 1px solid #eee; padding: 0.4rem 0.8rem; text-align: left; }}
.day {{ display: flex; align-items: center; gap: 0.5rem; margin: 2px 0; }}
.day .label {{ width: 7rem; }}
.day .bar {{ display: inline-block; height: 0.9rem; background: #4a7bd0; }}
</style>
</head>
<body>
<h1>Tontext downloads</h1>
<div class="cards">
<div class="card"><div>Total</div><div class="value">{total}</div></div>
<div class="card"><div>Today</div><div class="value">{today}</div></div>
<div class="card"><div>Unique IPs</div><div class="value">{unique_ips}</div></div>
</div>
<h2>Per version</h2>
<table>
<tr><th>Version</th><th>Downloads</th><th>First seen</th><th>Last seen</th></tr>
{versions}</table>
<h2>Last 30 days</h2>
{daily}</body>
</html>
"#,
        total = stats.total,
        today = stats.today,
        unique_ips = stats.unique_ips,
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
