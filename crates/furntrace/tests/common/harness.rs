//! Test harness for isolated test execution.
//!
//! The `TestHarness` struct owns a file-backed database in a temporary
//! directory, so tests exercise WAL mode and migrations the same way the
//! server does.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use furntrace::catalog;
use furntrace::db::order_repo::Order;
use furntrace::db::worker_repo::Worker;
use furntrace::db::DEFAULT_BUSY_TIMEOUT;
use furntrace::orders;
use furntrace::scan::DEFAULT_MAX_ATTEMPTS;
use furntrace::workers;
use furntrace::{process_scan, Database, ScanOutcome, ScanRequest};

use super::builders::{OrderBuilder, WorkerBuilder};

/// Isolated database for one integration test.
pub struct TestHarness {
    /// Keeps the directory alive for the lifetime of the harness.
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("furntrace.db");
        let db = Database::open(&db_path, DEFAULT_BUSY_TIMEOUT).expect("Failed to open database");
        Self {
            temp_dir,
            db_path,
            db,
        }
    }

    /// Creates a product and returns its id.
    pub fn product(&self, name: &str) -> i64 {
        catalog::create_product(&self.db, &super::builders::product(name))
            .expect("Failed to create product")
            .id
    }

    /// Creates a one-item order for `customer` worth `amount`.
    pub fn order(&self, customer: &str, amount: f64) -> Order {
        let product_id = self.product(&format!("{customer} sofa"));
        orders::create_order(&self.db, &OrderBuilder::new(customer).item(product_id, 1, amount).build())
            .expect("Failed to create order")
    }

    /// Creates a worker at `station` bound to `scanner`.
    pub fn worker(&self, name: &str, station: &str, scanner: &str) -> Worker {
        workers::create_worker(&self.db, &WorkerBuilder::new(name, station).scanner(scanner).build())
            .expect("Failed to create worker")
    }

    pub fn scan(&self, request: &ScanRequest) -> ScanOutcome {
        process_scan(&self.db, request, DEFAULT_MAX_ATTEMPTS).expect("Scan failed")
    }

    /// Counts rows of `table` satisfying `condition`.
    pub fn count(&self, table: &str, condition: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {condition}");
        self.db
            .with_conn(|conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
            .expect("Count query failed")
    }
}
