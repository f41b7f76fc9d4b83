//! Scan processing error types.

use thiserror::Error;

use crate::db::DatabaseError;

/// Why a scan could not be applied to any order. Rejections never mutate
/// order state or the process ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanRejection {
    #[error("invalid QR code format")]
    MalformedToken,

    #[error("order {0} not found")]
    OrderNotFound(i64),

    #[error("no worker is bound to scanner '{0}'")]
    UnknownScanner(String),

    #[error("worker {0} not found")]
    UnknownWorker(i64),

    #[error("a worker id or scanner code is required")]
    MissingActor,
}

impl ScanRejection {
    /// True for rejections caused by a missing record rather than bad input.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScanRejection::OrderNotFound(_)
                | ScanRejection::UnknownScanner(_)
                | ScanRejection::UnknownWorker(_)
        )
    }
}

/// Failures while processing a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Every attempt lost the race for the order's status row.
    #[error("order {order_id} kept changing concurrently; gave up after {attempts} attempts")]
    Conflict { order_id: i64, attempts: u32 },
}

impl ScanError {
    /// True when the same request may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            ScanError::Database(e) => e.is_transient(),
            ScanError::Conflict { .. } => true,
        }
    }
}
