//! Administrator dashboard: status mix, trend, best sellers, summary.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::trend::{trend, Period, TrendBucket};
use crate::db::stats_repo::{self, CustomerTotal, OrderSummary, ProductCount, StatusCount};
use crate::db::{Database, DatabaseError};

const TOP_N: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub status_dist: Vec<StatusCount>,
    pub trend: Vec<TrendBucket>,
    pub top_products: Vec<ProductCount>,
    pub top_customers: Vec<CustomerTotal>,
    pub summary: OrderSummary,
}

pub fn dashboard_stats<Tz: TimeZone>(
    db: &Database,
    period: Period,
    now: &DateTime<Tz>,
) -> Result<DashboardStats, DatabaseError> {
    Ok(DashboardStats {
        status_dist: stats_repo::status_distribution(db)?,
        trend: trend(db, period, now)?,
        top_products: stats_repo::top_products(db, TOP_N)?,
        top_customers: stats_repo::top_customers(db, TOP_N)?,
        summary: stats_repo::order_summary(db)?,
    })
}
