//! Health and delivery statistics.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use pushrelay_common::types::RecentActivity;

use crate::state::AppState;

/// Number of trailing log entries summarized in `recentActivity`.
const RECENT_WINDOW: usize = 10;

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub subscriptions: usize,
    pub recent_activity: RecentActivity,
    /// Seconds since the server state was built
    pub uptime: f64,
    pub memory: MemoryUsage,
}

#[derive(Debug, Serialize)]
pub struct MemoryUsage {
    /// Resident set size in bytes; `null` where the platform does not expose it
    pub rss: Option<u64>,
}

/// GET /status — Subscription count, recent delivery health, process stats.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let subscriptions = state.store.list().await.len();
    let recent = state.push_log.recent(RECENT_WINDOW).await;

    Json(StatusResponse {
        status: "running",
        subscriptions,
        recent_activity: RecentActivity::from_entries(&recent),
        uptime: state.started_at.elapsed().as_secs_f64(),
        memory: MemoryUsage {
            rss: resident_memory_bytes().await,
        },
    })
}

/// Read `VmRSS` from `/proc/self/status` (Linux only).
async fn resident_memory_bytes() -> Option<u64> {
    let status = tokio::fs::read_to_string("/proc/self/status").await.ok()?;
    parse_vm_rss(&status)
}

fn parse_vm_rss(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}
