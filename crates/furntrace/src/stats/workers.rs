//! Worker productivity report over a date range.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::day_window;
use crate::db::audit_repo::{self, ProcessEntry};
use crate::db::stats_repo::{self, StationCount, WorkerCount};
use crate::db::{date_string, Database};
use crate::error::{Result, ValidationError};

/// Default report length when no start date is given.
const DEFAULT_DAYS: u64 = 7;
/// Longest window a single report may cover.
pub const MAX_DAYS: i64 = 366;
const RECENT_LIMIT: u32 = 50;

/// Query of `GET /workers/stats`. Dates are local `YYYY-MM-DD`, both ends
/// inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerStatsQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "crate::paging::blank_as_none")]
    pub worker_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerReport {
    pub worker_totals: Vec<WorkerCount>,
    /// One entry per day in the range, zero-filled.
    pub daily_work: Vec<DayCount>,
    pub station_work: Vec<StationCount>,
    pub recent_logs: Vec<ProcessEntry>,
    pub date_range: DateRange,
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ValidationError::new(field, "must be a date in YYYY-MM-DD form"))?;
            if !(1..=9999).contains(&date.year()) {
                return Err(ValidationError::new(field, "year must be between 1 and 9999").into());
            }
            Ok(Some(date))
        }
    }
}

impl WorkerStatsQuery {
    /// Resolves the inclusive date range, defaulting to the last seven days
    /// ending `today`.
    pub fn range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let end = parse_date("end_date", self.end_date.as_deref())?.unwrap_or(today);
        let start = match parse_date("start_date", self.start_date.as_deref())? {
            Some(start) => start,
            None => end
                .checked_sub_days(Days::new(DEFAULT_DAYS - 1))
                .ok_or_else(|| ValidationError::new("end_date", "is out of range"))?,
        };

        if end < start {
            return Err(ValidationError::new("end_date", "must not be before start_date").into());
        }
        if (end - start).num_days() + 1 > MAX_DAYS {
            return Err(ValidationError::new(
                "start_date",
                format!("range may cover at most {} days", MAX_DAYS),
            )
            .into());
        }
        Ok((start, end))
    }
}

/// Builds the report. Process records count even if their worker or order
/// has since been deleted.
pub fn worker_report<Tz: TimeZone>(
    db: &Database,
    query: &WorkerStatsQuery,
    now: &DateTime<Tz>,
) -> Result<WorkerReport> {
    let tz = now.timezone();
    let (first, last) = query.range(now.date_naive())?;
    let (start, end) = day_window(&tz, first, last);
    let worker_id = query.worker_id.filter(|id| *id > 0);

    let mut daily: BTreeMap<NaiveDate, u64> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|d| (d, 0))
        .collect();
    for completed_at in stats_repo::process_times(db, &start, &end, worker_id)? {
        match DateTime::parse_from_rfc3339(&completed_at) {
            Ok(at) => {
                if let Some(count) = daily.get_mut(&at.with_timezone(&tz).date_naive()) {
                    *count += 1;
                }
            }
            Err(e) => log::warn!("Skipping process record with bad timestamp {completed_at:?}: {e}"),
        }
    }

    Ok(WorkerReport {
        worker_totals: stats_repo::process_counts_by_worker(db, &start, &end, worker_id, None)?,
        daily_work: daily
            .into_iter()
            .map(|(date, count)| DayCount {
                date: date_string(date),
                count,
            })
            .collect(),
        station_work: stats_repo::process_counts_by_station(db, &start, &end, worker_id)?,
        recent_logs: audit_repo::recent_processes(db, &start, &end, worker_id, RECENT_LIMIT)?,
        date_range: DateRange {
            start_date: date_string(first),
            end_date: date_string(last),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FurntraceError;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(start: Option<&str>, end: Option<&str>) -> WorkerStatsQuery {
        WorkerStatsQuery {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            worker_id: None,
        }
    }

    #[test]
    fn test_default_range_is_last_week() {
        let (start, end) = query(None, None).range(day(2026, 3, 10)).unwrap();
        assert_eq!(start, day(2026, 3, 4));
        assert_eq!(end, day(2026, 3, 10));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = query(Some("2026-03-10"), Some("2026-03-01"))
            .range(day(2026, 3, 10))
            .unwrap_err();
        assert!(matches!(err, FurntraceError::Validation(ref v) if v.field == "end_date"));
    }

    #[test]
    fn test_window_limit() {
        let today = day(2026, 12, 31);
        assert!(query(Some("2026-01-01"), Some("2026-12-31"))
            .range(today)
            .is_ok());
        assert!(query(Some("2025-01-01"), Some("2026-12-31"))
            .range(today)
            .is_err());
    }

    #[test]
    fn test_end_date_at_calendar_minimum_rejected() {
        let q = WorkerStatsQuery {
            end_date: Some(NaiveDate::MIN.to_string()),
            ..Default::default()
        };
        let err = q.range(day(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, FurntraceError::Validation(ref v) if v.field == "end_date"));

        let q = WorkerStatsQuery {
            start_date: Some("+10000-01-01".to_string()),
            ..Default::default()
        };
        let err = q.range(day(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, FurntraceError::Validation(ref v) if v.field == "start_date"));
    }

    #[test]
    fn test_default_start_before_first_year() {
        let (start, end) = query(None, Some("0001-01-03")).range(day(2026, 1, 1)).unwrap();
        assert_eq!(end, day(1, 1, 3));
        assert_eq!(start, day(0, 12, 28));
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = query(Some("03/01/2026"), None).range(day(2026, 3, 10)).unwrap_err();
        assert!(matches!(err, FurntraceError::Validation(ref v) if v.field == "start_date"));
    }

    #[test]
    fn test_empty_report_is_zero_filled() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let report = worker_report(&db, &query(None, None), &now).unwrap();

        assert_eq!(report.daily_work.len(), 7);
        assert_eq!(report.daily_work[0].date, "2026-03-04");
        assert!(report.daily_work.iter().all(|d| d.count == 0));
        assert!(report.worker_totals.is_empty());
        assert_eq!(report.date_range.end_date, "2026-03-10");
    }
}
