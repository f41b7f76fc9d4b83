//! Persistence seam for scan processing.

use crate::db::audit_repo::NewScanAttempt;
use crate::db::order_repo::Order;
use crate::db::worker_repo::Worker;
use crate::db::DatabaseError;
use crate::pipeline::{OrderStatus, Station};

/// Everything a successful transition writes, committed atomically.
#[derive(Debug, Clone)]
pub struct TransitionCommit<'a> {
    pub order_id: i64,
    /// Status the order was read with. The update only applies if the
    /// stored status still equals it.
    pub expected: OrderStatus,
    pub next: OrderStatus,
    pub station: Station,
    pub worker_id: i64,
    pub at: &'a str,
    pub attempt: NewScanAttempt<'a>,
}

/// Storage operations the scan processor depends on.
///
/// Implemented by [`crate::db::Database`]; tests substitute fakes to force
/// conflicts and failures.
pub trait ScanStore {
    /// Live order by id, with line items.
    fn find_order(&self, id: i64) -> Result<Option<Order>, DatabaseError>;

    /// Live worker by id.
    fn find_worker(&self, id: i64) -> Result<Option<Worker>, DatabaseError>;

    /// Live worker holding `code`.
    fn find_worker_by_scanner_code(&self, code: &str) -> Result<Option<Worker>, DatabaseError>;

    /// Applies the conditional status update, the process record and the
    /// successful scan attempt in one transaction.
    ///
    /// Returns `Ok(false)` and writes nothing when the stored status no
    /// longer equals `expected`.
    fn commit_transition(&self, commit: &TransitionCommit<'_>) -> Result<bool, DatabaseError>;

    /// Appends a scan attempt that changed nothing.
    fn record_attempt(&self, attempt: &NewScanAttempt<'_>) -> Result<(), DatabaseError>;
}
