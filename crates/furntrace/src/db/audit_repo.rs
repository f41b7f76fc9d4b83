//! Audit trail repository: the process ledger and the scan ledger.
//!
//! Both tables are append-only. Rows carry snapshots (worker name, station)
//! so they stay readable after the referenced worker or order is deleted.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use super::{Database, DatabaseError};
use crate::pipeline::Station;

/// A process ledger entry to append. One per successful transition.
#[derive(Debug, Clone)]
pub struct NewProcess<'a> {
    pub order_id: i64,
    pub station: Station,
    pub worker_id: i64,
    pub completed_at: &'a str,
}

/// A scan ledger entry to append. One per attributable scan attempt.
#[derive(Debug, Clone)]
pub struct NewScanAttempt<'a> {
    pub worker_id: i64,
    pub worker_name: &'a str,
    pub station: &'a str,
    pub content: &'a str,
    pub scanner_code: Option<&'a str>,
    pub is_success: bool,
    pub message: &'a str,
    pub order_id: Option<i64>,
    pub created_at: &'a str,
}

/// A stored scan attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanAttempt {
    pub id: i64,
    pub worker_id: i64,
    pub worker_name: String,
    pub station: String,
    pub content: String,
    pub scanner_code: Option<String>,
    pub is_success: bool,
    pub message: String,
    pub order_id: Option<i64>,
    pub created_at: String,
}

impl ScanAttempt {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            worker_id: row.get("worker_id")?,
            worker_name: row.get("worker_name")?,
            station: row.get("station")?,
            content: row.get("content")?,
            scanner_code: row.get("scanner_code")?,
            is_success: row.get("is_success")?,
            message: row.get("message")?,
            order_id: row.get("order_id")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A process record joined with the order number and worker name for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEntry {
    pub id: i64,
    pub order_id: i64,
    pub order_no: Option<String>,
    pub worker_id: i64,
    pub worker_name: Option<String>,
    pub station: String,
    pub completed_at: String,
}

pub(crate) fn append_process_in(
    conn: &Connection,
    process: &NewProcess<'_>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO processes (order_id, station, worker_id, completed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            process.order_id,
            process.station.as_str(),
            process.worker_id,
            process.completed_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn append_scan_attempt_in(
    conn: &Connection,
    attempt: &NewScanAttempt<'_>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO scan_logs (worker_id, worker_name, station, content, scanner_code,
         is_success, message, order_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            attempt.worker_id,
            attempt.worker_name,
            attempt.station,
            attempt.content,
            attempt.scanner_code,
            attempt.is_success,
            attempt.message,
            attempt.order_id,
            attempt.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Appends a scan attempt outside of any transition.
pub fn append_scan_attempt(
    db: &Database,
    attempt: &NewScanAttempt<'_>,
) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| append_scan_attempt_in(conn, attempt))
}

/// Most recent scan attempts, newest first. With `failed_only`, only
/// unsuccessful ones.
pub fn recent_scan_attempts(
    db: &Database,
    limit: u32,
    failed_only: bool,
) -> Result<Vec<ScanAttempt>, DatabaseError> {
    db.with_conn(|conn| {
        let sql = if failed_only {
            "SELECT * FROM scan_logs WHERE is_success = 0
             ORDER BY created_at DESC, id DESC LIMIT ?1"
        } else {
            "SELECT * FROM scan_logs ORDER BY created_at DESC, id DESC LIMIT ?1"
        };
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![limit], ScanAttempt::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Most recent process records completed in `[start, end)`, newest first.
///
/// Records are kept regardless of whether the order or worker has since been
/// deleted; the joined names are then still shown.
pub fn recent_processes(
    db: &Database,
    start: &str,
    end: &str,
    worker_id: Option<i64>,
    limit: u32,
) -> Result<Vec<ProcessEntry>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT p.id, p.order_id, o.order_no, p.worker_id, w.name AS worker_name,
                    p.station, p.completed_at
             FROM processes p
             LEFT JOIN orders o ON o.id = p.order_id
             LEFT JOIN workers w ON w.id = p.worker_id
             WHERE p.completed_at >= ?1 AND p.completed_at < ?2
               AND (?3 IS NULL OR p.worker_id = ?3)
             ORDER BY p.completed_at DESC, p.id DESC
             LIMIT ?4",
        )?;
        let rows = stmt
            .query_map(params![start, end, worker_id, limit], |row| {
                Ok(ProcessEntry {
                    id: row.get("id")?,
                    order_id: row.get("order_id")?,
                    order_no: row.get("order_no")?,
                    worker_id: row.get("worker_id")?,
                    worker_name: row.get("worker_name")?,
                    station: row.get("station")?,
                    completed_at: row.get("completed_at")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Counts process records for an order. Used to check exactly-once
/// transitions.
pub fn count_processes_for_order(db: &Database, order_id: i64) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM processes WHERE order_id = ?1",
            params![order_id],
            |r| r.get(0),
        )?)
    })
}
