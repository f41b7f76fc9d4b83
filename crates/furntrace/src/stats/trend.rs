//! Order count and revenue over recent days or months.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::start_of_day;
use crate::db::{stats_repo, timestamp, Database, DatabaseError};

/// Trend granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// 7 daily buckets.
    #[default]
    Week,
    /// 30 daily buckets.
    Month,
    /// 12 monthly buckets.
    Year,
}

impl Period {
    /// Lenient parse: anything unrecognized, including nothing, is a week.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("month") => Period::Month,
            Some("year") => Period::Year,
            _ => Period::Week,
        }
    }
}

/// One trend interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-MM` for monthly ones.
    pub date: String,
    pub count: u64,
    pub revenue: f64,
}

struct Interval {
    key: String,
    start: NaiveDate,
    end: NaiveDate,
}

fn first_of_month(year: i32, month0: i32) -> Option<NaiveDate> {
    let (y, m) = (year + month0.div_euclid(12), month0.rem_euclid(12) + 1);
    NaiveDate::from_ymd_opt(y, m as u32, 1)
}

/// Local calendar intervals for `period`, oldest first, the last containing
/// `today`.
fn intervals(period: Period, today: NaiveDate) -> Vec<Interval> {
    match period {
        Period::Week | Period::Month => {
            let days = if period == Period::Week { 7 } else { 30 };
            (0..days)
                .rev()
                .map(|back| {
                    let start = today - Duration::days(back);
                    Interval {
                        key: start.format("%Y-%m-%d").to_string(),
                        start,
                        end: start + Duration::days(1),
                    }
                })
                .collect()
        }
        Period::Year => {
            let current = today.month0() as i32;
            (0..12)
                .rev()
                .filter_map(|back| {
                    let start = first_of_month(today.year(), current - back)?;
                    let end = first_of_month(today.year(), current - back + 1)?;
                    Some(Interval {
                        key: start.format("%Y-%m").to_string(),
                        start,
                        end,
                    })
                })
                .collect()
        }
    }
}

/// Count and summed amount of live orders per bucket ending at `now`.
pub fn trend<Tz: TimeZone>(
    db: &Database,
    period: Period,
    now: &DateTime<Tz>,
) -> Result<Vec<TrendBucket>, DatabaseError> {
    let tz = now.timezone();
    intervals(period, now.date_naive())
        .into_iter()
        .map(|interval| {
            let start = timestamp(start_of_day(&tz, interval.start));
            let end = timestamp(start_of_day(&tz, interval.end));
            let (count, revenue) = stats_repo::order_totals_between(db, &start, &end)?;
            Ok(TrendBucket {
                date: interval.key,
                count,
                revenue,
            })
        })
        .collect()
}
