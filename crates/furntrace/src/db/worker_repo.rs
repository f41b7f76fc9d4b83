//! Worker repository: CRUD operations for the `workers` table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::{now_timestamp, Database, DatabaseError};

/// A production-floor worker bound to one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worker {
    pub id: i64,
    pub name: String,
    /// Station name as stored. Validated on write, but read back as text so
    /// that legacy rows with retired station names still load.
    pub station: String,
    pub phone: String,
    pub scanner_code: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl Worker {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            station: row.get("station")?,
            phone: row.get("phone")?,
            scanner_code: row.get("scanner_code")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
        })
    }
}

/// Writable worker columns.
#[derive(Debug, Clone, Default)]
pub struct WorkerFields {
    pub name: String,
    pub station: String,
    pub phone: String,
    pub scanner_code: Option<String>,
}

/// Query filter parameters for worker listing.
#[derive(Debug, Default, Clone)]
pub struct WorkerFilter {
    pub station: Option<String>,
    pub q: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Inserts a new worker and returns the stored row.
pub fn insert(db: &Database, fields: &WorkerFields) -> Result<Worker, DatabaseError> {
    db.with_conn(|conn| {
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO workers (name, station, phone, scanner_code, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                fields.name,
                fields.station,
                fields.phone,
                fields.scanner_code,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        worker_in(conn, id)?.ok_or(DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    })
}

/// Overwrites a live worker. Returns `None` if it does not exist.
pub fn update(
    db: &Database,
    id: i64,
    fields: &WorkerFields,
) -> Result<Option<Worker>, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE workers SET name = ?2, station = ?3, phone = ?4, scanner_code = ?5,
             updated_at = ?6 WHERE id = ?1 AND deleted_at IS NULL",
            params![
                id,
                fields.name,
                fields.station,
                fields.phone,
                fields.scanner_code,
                now_timestamp()
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        worker_in(conn, id)
    })
}

/// Finds a live worker by id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Worker>, DatabaseError> {
    db.with_conn(|conn| worker_in(conn, id))
}

fn worker_in(conn: &Connection, id: i64) -> Result<Option<Worker>, DatabaseError> {
    Ok(conn
        .query_row(
            "SELECT * FROM workers WHERE id = ?1 AND deleted_at IS NULL",
            params![id],
            Worker::from_row,
        )
        .optional()?)
}

/// Finds the live worker holding the given scanner code.
pub fn find_by_scanner_code(db: &Database, code: &str) -> Result<Option<Worker>, DatabaseError> {
    db.with_conn(|conn| {
        Ok(conn
            .query_row(
                "SELECT * FROM workers WHERE scanner_code = ?1 AND deleted_at IS NULL",
                params![code],
                Worker::from_row,
            )
            .optional()?)
    })
}

/// Queries live workers with filters, returning (rows, total_count).
pub fn query(db: &Database, filter: &WorkerFilter) -> Result<(Vec<Worker>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref station) = filter.station {
            conditions.push(format!("station = ?{}", param_values.len() + 1));
            param_values.push(Box::new(station.clone()));
        }
        if let Some(ref q) = filter.q {
            let n = param_values.len() + 1;
            conditions.push(format!("(name LIKE ?{n} OR phone LIKE ?{n})"));
            param_values.push(Box::new(format!("%{}%", q)));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_sql = format!("SELECT COUNT(*) FROM workers {}", where_clause);
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let total: u64 = conn.query_row(&count_sql, params_ref.as_slice(), |r| r.get(0))?;

        let limit = filter.limit.unwrap_or(100) as i64;
        let offset = filter.offset.unwrap_or(0) as i64;
        param_values.push(Box::new(limit));
        param_values.push(Box::new(offset));
        let query_sql = format!(
            "SELECT * FROM workers {} ORDER BY id ASC LIMIT ?{} OFFSET ?{}",
            where_clause,
            param_values.len() - 1,
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&query_sql)?;
        let rows: Vec<Worker> = stmt
            .query_map(params_ref.as_slice(), Worker::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    })
}

/// Tombstones a worker. Audit rows keep their snapshot of the name.
pub fn soft_delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE workers SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
            params![id, now_timestamp()],
        )?;
        Ok(changed > 0)
    })
}
