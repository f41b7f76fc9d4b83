//! Shop-floor station dashboard for the current day.

use chrono::{DateTime, Duration, TimeZone};
use serde::Serialize;

use super::day_window;
use crate::db::audit_repo::{self, ScanAttempt};
use crate::db::stats_repo::{self, DeadlineEntry, StationCount, WorkerCount};
use crate::db::{date_string, Database, DatabaseError};

const LEADERBOARD_SIZE: u32 = 3;
/// Deadlines up to this many days ahead are shown.
const DEADLINE_HORIZON_DAYS: i64 = 3;

/// How many scan attempts the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationLimits {
    pub recent_logs: u32,
    pub error_logs: u32,
}

impl Default for StationLimits {
    fn default() -> Self {
        Self {
            recent_logs: 20,
            error_logs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub today_count: u64,
    pub leaderboard: Vec<WorkerCount>,
    pub station_dist: Vec<StationCount>,
    pub recent_logs: Vec<ScanAttempt>,
    pub error_logs: Vec<ScanAttempt>,
    pub upcoming_deadlines: Vec<DeadlineEntry>,
}

pub fn station_stats<Tz: TimeZone>(
    db: &Database,
    limits: StationLimits,
    now: &DateTime<Tz>,
) -> Result<StationStats, DatabaseError> {
    let today = now.date_naive();
    let (start, end) = day_window(&now.timezone(), today, today);
    let horizon = today + Duration::days(DEADLINE_HORIZON_DAYS);

    Ok(StationStats {
        today_count: stats_repo::count_processes_between(db, &start, &end)?,
        leaderboard: stats_repo::process_counts_by_worker(
            db,
            &start,
            &end,
            None,
            Some(LEADERBOARD_SIZE),
        )?,
        station_dist: stats_repo::process_counts_by_station(db, &start, &end, None)?,
        recent_logs: audit_repo::recent_scan_attempts(db, limits.recent_logs, false)?,
        error_logs: audit_repo::recent_scan_attempts(db, limits.error_logs, true)?,
        upcoming_deadlines: stats_repo::upcoming_deadlines(
            db,
            &date_string(today),
            &date_string(horizon),
        )?,
    })
}
