//! Statistics repository: read-only rollups over orders and the process
//! ledger.
//!
//! Time bounds are column-format UTC timestamps and always half-open
//! `[start, end)`. Bucketing by local calendar day happens in
//! [`crate::stats`].

use rusqlite::params;
use serde::Serialize;

use super::{Database, DatabaseError};
use crate::pipeline::OrderStatus;

/// Number of live orders in one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    #[serde(rename = "name")]
    pub status: OrderStatus,
    #[serde(rename = "value")]
    pub count: u64,
}

/// Live orders grouped by status, in pipeline order. Empty statuses are
/// omitted.
pub fn status_distribution(db: &Database) -> Result<Vec<StatusCount>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT status, COUNT(*) FROM orders WHERE deleted_at IS NULL GROUP BY status",
        )?;
        let mut rows = stmt
            .query_map([], |row| {
                Ok(StatusCount {
                    status: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by_key(|r| r.status.ordinal());
        Ok(rows)
    })
}

/// Count and summed amount of live orders created in `[start, end)`.
pub fn order_totals_between(
    db: &Database,
    start: &str,
    end: &str,
) -> Result<(u64, f64), DatabaseError> {
    db.with_conn(|conn| {
        Ok(conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM orders
             WHERE deleted_at IS NULL AND created_at >= ?1 AND created_at < ?2",
            params![start, end],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?)
    })
}

/// A product with its line-item count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCount {
    pub product_id: i64,
    pub name: String,
    pub count: u64,
}

/// Products most often appearing as line items of live orders.
pub fn top_products(db: &Database, limit: u32) -> Result<Vec<ProductCount>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, COUNT(i.id) AS cnt
             FROM order_items i
             JOIN products p ON p.id = i.product_id AND p.deleted_at IS NULL
             JOIN orders o ON o.id = i.order_id AND o.deleted_at IS NULL
             GROUP BY p.id, p.name
             ORDER BY cnt DESC, p.id ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(ProductCount {
                    product_id: row.get(0)?,
                    name: row.get(1)?,
                    count: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// A customer name with its order count and spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotal {
    pub name: String,
    pub count: u64,
    pub amount: f64,
}

/// Customers with the most live orders. Ties go to whoever ordered first.
pub fn top_customers(db: &Database, limit: u32) -> Result<Vec<CustomerTotal>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT customer_name, COUNT(*) AS cnt, COALESCE(SUM(amount), 0)
             FROM orders
             WHERE deleted_at IS NULL AND customer_name <> ''
             GROUP BY customer_name
             ORDER BY cnt DESC, MIN(id) ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(CustomerTotal {
                    name: row.get(0)?,
                    count: row.get(1)?,
                    amount: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Headline numbers over all live orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderSummary {
    pub total: u64,
    pub completed: u64,
    /// Orders not yet started (`awaiting-cutting`).
    pub pending: u64,
    pub revenue: f64,
}

pub fn order_summary(db: &Database) -> Result<OrderSummary, DatabaseError> {
    db.with_conn(|conn| {
        Ok(conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN status = ?1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN status = ?2 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(amount), 0)
             FROM orders WHERE deleted_at IS NULL",
            params![OrderStatus::Completed, OrderStatus::INITIAL],
            |r| {
                Ok(OrderSummary {
                    total: r.get(0)?,
                    completed: r.get(1)?,
                    pending: r.get(2)?,
                    revenue: r.get(3)?,
                })
            },
        )?)
    })
}

/// Process records attributed to one worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerCount {
    pub worker_id: i64,
    pub name: String,
    pub station: String,
    pub count: u64,
}

/// Process records in `[start, end)` per worker, busiest first.
///
/// Deleted workers still count; their last known name and station are used.
pub fn process_counts_by_worker(
    db: &Database,
    start: &str,
    end: &str,
    worker_id: Option<i64>,
    limit: Option<u32>,
) -> Result<Vec<WorkerCount>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT p.worker_id, COALESCE(w.name, ''), COALESCE(w.station, MAX(p.station)),
                    COUNT(*) AS cnt
             FROM processes p
             LEFT JOIN workers w ON w.id = p.worker_id
             WHERE p.completed_at >= ?1 AND p.completed_at < ?2
               AND (?3 IS NULL OR p.worker_id = ?3)
             GROUP BY p.worker_id
             ORDER BY cnt DESC, p.worker_id ASC
             LIMIT ?4",
        )?;
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map_or(-1, i64::from);
        let rows = stmt
            .query_map(params![start, end, worker_id, limit], |row| {
                Ok(WorkerCount {
                    worker_id: row.get(0)?,
                    name: row.get(1)?,
                    station: row.get(2)?,
                    count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Process records for one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationCount {
    pub station: String,
    pub count: u64,
}

/// Process records in `[start, end)` per station, busiest first.
pub fn process_counts_by_station(
    db: &Database,
    start: &str,
    end: &str,
    worker_id: Option<i64>,
) -> Result<Vec<StationCount>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT station, COUNT(*) AS cnt FROM processes
             WHERE completed_at >= ?1 AND completed_at < ?2
               AND (?3 IS NULL OR worker_id = ?3)
             GROUP BY station
             ORDER BY cnt DESC, station ASC",
        )?;
        let rows = stmt
            .query_map(params![start, end, worker_id], |row| {
                Ok(StationCount {
                    station: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Completion timestamps of process records in `[start, end)`, oldest first.
pub fn process_times(
    db: &Database,
    start: &str,
    end: &str,
    worker_id: Option<i64>,
) -> Result<Vec<String>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT completed_at FROM processes
             WHERE completed_at >= ?1 AND completed_at < ?2
               AND (?3 IS NULL OR worker_id = ?3)
             ORDER BY completed_at ASC",
        )?;
        let rows = stmt
            .query_map(params![start, end, worker_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    })
}

/// Number of process records in `[start, end)`.
pub fn count_processes_between(db: &Database, start: &str, end: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM processes WHERE completed_at >= ?1 AND completed_at < ?2",
            params![start, end],
            |r| r.get(0),
        )?)
    })
}

/// An unfinished order with a deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlineEntry {
    pub id: i64,
    pub order_no: String,
    pub customer_name: String,
    pub deadline: String,
    pub status: OrderStatus,
}

/// Live, uncompleted orders whose deadline date falls in
/// `[first_day, last_day]`, soonest first.
pub fn upcoming_deadlines(
    db: &Database,
    first_day: &str,
    last_day: &str,
) -> Result<Vec<DeadlineEntry>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, order_no, customer_name, deadline, status FROM orders
             WHERE deleted_at IS NULL AND status <> ?3
               AND deadline IS NOT NULL AND deadline >= ?1 AND deadline <= ?2
             ORDER BY deadline ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(
                params![first_day, last_day, OrderStatus::Completed],
                |row| {
                    Ok(DeadlineEntry {
                        id: row.get(0)?,
                        order_no: row.get(1)?,
                        customer_name: row.get(2)?,
                        deadline: row.get(3)?,
                        status: row.get(4)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}
