//! Human-readable order numbers: `ORD-<YYYYMMDDhhmmss>-<6 digits>`.

use chrono::{DateTime, TimeZone};
use uuid::Uuid;

/// Builds an order number from the creation time and a random suffix in
/// `100000..=999999`.
pub fn generate<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // v4 uuids are the random source; no separate RNG dependency.
    let suffix = Uuid::new_v4().as_u128() % 900_000 + 100_000;
    format!("ORD-{}-{}", now.format("%Y%m%d%H%M%S"), suffix)
}
