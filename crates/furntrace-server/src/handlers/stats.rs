//! Dashboard and report endpoints. Day boundaries follow the server's local
//! time zone.

use axum::extract::State;
use axum::Json;
use chrono::Local;
use furntrace::stats::{
    self, DashboardStats, Period, StationLimits, StationStats, WorkerReport, WorkerStatsQuery,
};
use serde::Deserialize;

use super::blocking;
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub period: Option<String>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<DashboardStats>, ApiError> {
    let period = Period::parse_or_default(query.period.as_deref());
    blocking(move || stats::dashboard_stats(&state.db, period, &Local::now()))
        .await
        .map(Json)
}

pub async fn station(State(state): State<AppState>) -> Result<Json<StationStats>, ApiError> {
    let limits = StationLimits {
        recent_logs: state.config.scan.recent_log_limit,
        error_logs: state.config.scan.error_log_limit,
    };
    blocking(move || stats::station_stats(&state.db, limits, &Local::now()))
        .await
        .map(Json)
}

pub async fn workers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<WorkerStatsQuery>,
) -> Result<Json<WorkerReport>, ApiError> {
    blocking(move || stats::worker_report(&state.db, &query, &Local::now()))
        .await
        .map(Json)
}
