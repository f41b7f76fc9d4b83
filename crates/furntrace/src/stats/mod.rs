//! Read-only rollups for the dashboards.
//!
//! Everything here takes "now" (or "today") as an argument in some time
//! zone, so calendar boundaries follow the caller's local time while the
//! queries run against UTC column values.

pub mod dashboard;
pub mod station;
pub mod trend;
pub mod workers;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::db::timestamp;

pub use dashboard::{dashboard_stats, DashboardStats};
pub use station::{station_stats, StationLimits, StationStats};
pub use trend::{trend, Period, TrendBucket};
pub use workers::{worker_report, DateRange, DayCount, WorkerReport, WorkerStatsQuery};

/// First instant of `date` in `tz`, in UTC.
pub(crate) fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        // Midnight skipped by a DST jump: fall back to the standard offset.
        LocalResult::None => {
            let offset = tz.offset_from_utc_datetime(&midnight).fix();
            let utc = midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
            Utc.from_utc_datetime(&utc)
        }
    }
}

/// `[start of first, start of the day after last)` as column timestamps.
pub(crate) fn day_window<Tz: TimeZone>(
    tz: &Tz,
    first: NaiveDate,
    last: NaiveDate,
) -> (String, String) {
    let end = last.succ_opt().unwrap_or(last);
    (
        timestamp(start_of_day(tz, first)),
        timestamp(start_of_day(tz, end)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_start_of_day_in_offset_zone() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(
            timestamp(start_of_day(&tz, date)),
            "2026-01-01T16:00:00Z"
        );
    }

    #[test]
    fn test_day_window_is_half_open() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let (start, end) = day_window(&Utc, date, date);
        assert_eq!(start, "2026-02-28T00:00:00Z");
        assert_eq!(end, "2026-03-01T00:00:00Z");
    }
}
