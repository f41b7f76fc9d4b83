//! Scan processing: token and actor resolution, the transition decision and
//! the audit writes that go with it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use super::actor::resolve_actor;
use super::error::{ScanError, ScanRejection};
use super::store::{ScanStore, TransitionCommit};
use super::token::parse_order_token;
use crate::db::audit_repo::NewScanAttempt;
use crate::db::order_repo::Order;
use crate::db::worker_repo::Worker;
use crate::db::now_timestamp;
use crate::pipeline::{transition, OrderStatus, Station};

/// Default number of read-decide-commit passes before giving up on an order
/// whose status keeps changing underneath us.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// A scan as submitted by a scanner device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Raw scanned content.
    pub qr_code: String,
    /// Legacy explicit worker identity.
    #[serde(default)]
    pub worker_id: Option<i64>,
    /// Code of the scanner device; identifies the worker when present.
    #[serde(default)]
    pub scanner_code: Option<String>,
}

/// What a scan did.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The order moved one step forward.
    Advanced {
        order: Order,
        prev_status: OrderStatus,
        new_status: OrderStatus,
        message: String,
    },
    /// The scan was valid but the worker's station does not apply to the
    /// order's current status.
    NoOp { order: Order, message: String },
    Rejected(ScanRejection),
}

/// Processes one scan against `store`.
///
/// Rejections are returned as [`ScanOutcome::Rejected`], not as errors.
/// `Err` is reserved for storage failures and for exhausting
/// `max_attempts` against concurrent writers.
pub fn process_scan<S: ScanStore + ?Sized>(
    store: &S,
    request: &ScanRequest,
    max_attempts: u32,
) -> Result<ScanOutcome, ScanError> {
    let _span = info_span!(
        "scan",
        content = %request.qr_code.trim(),
        worker_id = request.worker_id,
        scanner_code = request.scanner_code.as_deref()
    )
    .entered();

    let order = match parse_order_token(&request.qr_code) {
        Ok(id) => store.find_order(id)?.ok_or(ScanRejection::OrderNotFound(id)),
        Err(rejection) => Err(rejection),
    };
    let worker = resolve_actor(
        store,
        request.scanner_code.as_deref(),
        request.worker_id,
    )?;

    let (order, worker) = match (order, worker) {
        (Ok(order), Ok(worker)) => (order, worker),
        (Err(rejection), Ok(worker)) => {
            record_failure(store, request, &worker, None, &rejection.to_string())?;
            debug!(%rejection, "Scan rejected");
            return Ok(ScanOutcome::Rejected(rejection));
        }
        (Err(rejection), Err(_)) | (Ok(_), Err(rejection)) => {
            debug!(%rejection, "Scan rejected without an attributable worker");
            return Ok(ScanOutcome::Rejected(rejection));
        }
    };

    advance(store, request, order, &worker, max_attempts.max(1))
}

fn advance<S: ScanStore + ?Sized>(
    store: &S,
    request: &ScanRequest,
    mut order: Order,
    worker: &Worker,
    max_attempts: u32,
) -> Result<ScanOutcome, ScanError> {
    // A worker row with a retired station name can never advance anything.
    let station = worker.station.parse::<Station>().ok();

    for attempt in 1..=max_attempts {
        let current = order.status;
        let next = station.map_or(current, |s| transition(current, s));

        let Some(station) = station.filter(|_| next != current) else {
            let message = format!(
                "Status unchanged: order is {}, station {} does not apply",
                current, worker.station
            );
            record_failure(store, request, worker, Some(order.id), &message)?;
            info!(order_id = order.id, status = %current, "Scan was a no-op");
            return Ok(ScanOutcome::NoOp { order, message });
        };

        let at = now_timestamp();
        let message = format!("Order {} advanced to {}", order.order_no, next);
        let committed = store.commit_transition(&TransitionCommit {
            order_id: order.id,
            expected: current,
            next,
            station,
            worker_id: worker.id,
            at: &at,
            attempt: NewScanAttempt {
                worker_id: worker.id,
                worker_name: &worker.name,
                station: &worker.station,
                content: &request.qr_code,
                scanner_code: scanner_code(request),
                is_success: true,
                message: &message,
                order_id: Some(order.id),
                created_at: &at,
            },
        })?;

        if committed {
            info!(
                order_id = order.id,
                from = %current,
                to = %next,
                worker_id = worker.id,
                "Order advanced"
            );
            order.status = next;
            order.updated_at = at;
            return Ok(ScanOutcome::Advanced {
                order,
                prev_status: current,
                new_status: next,
                message,
            });
        }

        warn!(
            order_id = order.id,
            attempt, "Order status changed concurrently, re-reading"
        );
        order = match store.find_order(order.id)? {
            Some(fresh) => fresh,
            None => {
                let rejection = ScanRejection::OrderNotFound(order.id);
                record_failure(store, request, worker, None, &rejection.to_string())?;
                return Ok(ScanOutcome::Rejected(rejection));
            }
        };
    }

    Err(ScanError::Conflict {
        order_id: order.id,
        attempts: max_attempts,
    })
}

fn scanner_code(request: &ScanRequest) -> Option<&str> {
    request.scanner_code.as_deref().filter(|c| !c.trim().is_empty())
}

fn record_failure<S: ScanStore + ?Sized>(
    store: &S,
    request: &ScanRequest,
    worker: &Worker,
    order_id: Option<i64>,
    message: &str,
) -> Result<(), ScanError> {
    let at = now_timestamp();
    store.record_attempt(&NewScanAttempt {
        worker_id: worker.id,
        worker_name: &worker.name,
        station: &worker.station,
        content: &request.qr_code,
        scanner_code: scanner_code(request),
        is_success: false,
        message,
        order_id,
        created_at: &at,
    })?;
    Ok(())
}
