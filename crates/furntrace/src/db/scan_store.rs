//! [`ScanStore`] backed by SQLite.

use super::audit_repo::{self, NewProcess, NewScanAttempt};
use super::order_repo::{self, Order};
use super::worker_repo::{self, Worker};
use super::{Database, DatabaseError};
use crate::scan::store::{ScanStore, TransitionCommit};

impl ScanStore for Database {
    fn find_order(&self, id: i64) -> Result<Option<Order>, DatabaseError> {
        order_repo::find_by_id(self, id)
    }

    fn find_worker(&self, id: i64) -> Result<Option<Worker>, DatabaseError> {
        worker_repo::find_by_id(self, id)
    }

    fn find_worker_by_scanner_code(&self, code: &str) -> Result<Option<Worker>, DatabaseError> {
        worker_repo::find_by_scanner_code(self, code)
    }

    fn commit_transition(&self, commit: &TransitionCommit<'_>) -> Result<bool, DatabaseError> {
        self.with_transaction(|conn| {
            let applied = order_repo::conditional_update_status_in(
                conn,
                commit.order_id,
                commit.expected,
                commit.next,
                commit.at,
            )?;
            if !applied {
                return Ok(false);
            }

            audit_repo::append_process_in(
                conn,
                &NewProcess {
                    order_id: commit.order_id,
                    station: commit.station,
                    worker_id: commit.worker_id,
                    completed_at: commit.at,
                },
            )?;
            audit_repo::append_scan_attempt_in(conn, &commit.attempt)?;
            Ok(true)
        })
    }

    fn record_attempt(&self, attempt: &NewScanAttempt<'_>) -> Result<(), DatabaseError> {
        audit_repo::append_scan_attempt(self, attempt).map(|_| ())
    }
}
