//! End-to-end scan flows against a file-backed database.

mod common;

use std::thread;

use common::{scan_by_scanner, scan_by_worker, TestHarness};
use furntrace::db::audit_repo;
use furntrace::orders::{self, StatusOverrideRequest};
use furntrace::scan::DEFAULT_MAX_ATTEMPTS;
use furntrace::{process_scan, OrderStatus, ScanOutcome, ScanRejection};

#[test]
fn test_cutting_scan_advances_and_records_audit() {
    let h = TestHarness::new();
    let order = h.order("Alice", 1200.0);
    let worker = h.worker("Wang", "cutting", "SC-CUT-1");

    let outcome = h.scan(&scan_by_scanner(&order.qr_code, "SC-CUT-1"));
    match outcome {
        ScanOutcome::Advanced {
            order: updated,
            prev_status,
            new_status,
            ..
        } => {
            assert_eq!(prev_status, OrderStatus::AwaitingCutting);
            assert_eq!(new_status, OrderStatus::AwaitingTrimming);
            assert_eq!(updated.id, order.id);
        }
        other => panic!("expected an advance, got {other:?}"),
    }

    assert_eq!(
        orders::get_order(&h.db, order.id).unwrap().status,
        OrderStatus::AwaitingTrimming
    );
    assert_eq!(
        h.count(
            "processes",
            &format!("order_id = {} AND station = 'cutting' AND worker_id = {}", order.id, worker.id)
        ),
        1
    );
    assert_eq!(
        h.count("scan_logs", &format!("is_success = 1 AND order_id = {}", order.id)),
        1
    );
}

#[test]
fn test_wrong_station_is_noop_with_failed_log() {
    let h = TestHarness::new();
    let order = h.order("Bob", 500.0);
    h.worker("Li", "covering", "SC-COV-1");

    let outcome = h.scan(&scan_by_scanner(&order.qr_code, "SC-COV-1"));
    assert!(matches!(outcome, ScanOutcome::NoOp { .. }));

    assert_eq!(
        orders::get_order(&h.db, order.id).unwrap().status,
        OrderStatus::AwaitingCutting
    );
    assert_eq!(h.count("processes", "1 = 1"), 0);
    let failed = audit_repo::recent_scan_attempts(&h.db, 10, true).unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].order_id, Some(order.id));
    assert_eq!(failed[0].scanner_code.as_deref(), Some("SC-COV-1"));
}

#[test]
fn test_full_line_with_url_tokens_and_legacy_ids() {
    let h = TestHarness::new();
    let order = h.order("Carol", 800.0);
    let crew: Vec<_> = ["cutting", "trimming", "covering", "shipping", "payment"]
        .iter()
        .enumerate()
        .map(|(i, station)| h.worker(&format!("W{i}"), station, &format!("SC-{i}")))
        .collect();

    let url = format!("https://shop.example/scan?from=label&id={}", order.id);
    for worker in &crew {
        let outcome = h.scan(&scan_by_worker(&url, worker.id));
        assert!(
            matches!(outcome, ScanOutcome::Advanced { .. }),
            "{} should advance, got {outcome:?}",
            worker.station
        );
    }

    assert_eq!(
        orders::get_order(&h.db, order.id).unwrap().status,
        OrderStatus::Completed
    );
    assert_eq!(audit_repo::count_processes_for_order(&h.db, order.id).unwrap(), 5);

    // Completed is terminal for every station.
    for worker in &crew {
        assert!(matches!(
            h.scan(&scan_by_worker(&order.qr_code, worker.id)),
            ScanOutcome::NoOp { .. }
        ));
    }
    assert_eq!(audit_repo::count_processes_for_order(&h.db, order.id).unwrap(), 5);
}

#[test]
fn test_override_then_scan_follows_new_status() {
    let h = TestHarness::new();
    let order = h.order("Dan", 300.0);
    h.worker("Zhao", "delivery", "SC-DEL");

    orders::override_status(
        &h.db,
        order.id,
        &StatusOverrideRequest {
            status: "awaiting-delivery".to_string(),
        },
    )
    .unwrap();
    assert_eq!(h.count("processes", "1 = 1"), 0);

    let outcome = h.scan(&scan_by_scanner(&order.qr_code, "SC-DEL"));
    assert!(matches!(
        outcome,
        ScanOutcome::Advanced {
            new_status: OrderStatus::AwaitingPayment,
            ..
        }
    ));
}

#[test]
fn test_deleted_order_rejects_scan() {
    let h = TestHarness::new();
    let order = h.order("Eve", 100.0);
    h.worker("Sun", "cutting", "SC-CUT");
    orders::delete_order(&h.db, order.id).unwrap();

    let outcome = h.scan(&scan_by_scanner(&order.qr_code, "SC-CUT"));
    assert_eq!(outcome, ScanOutcome::Rejected(ScanRejection::OrderNotFound(order.id)));
    assert_eq!(h.count("scan_logs", "is_success = 0 AND order_id IS NULL"), 1);
}

#[test]
fn test_unbound_scanner_leaves_no_trace() {
    let h = TestHarness::new();
    let order = h.order("Fay", 100.0);

    let outcome = h.scan(&scan_by_scanner(&order.qr_code, "NOBODY"));
    assert_eq!(
        outcome,
        ScanOutcome::Rejected(ScanRejection::UnknownScanner("NOBODY".to_string()))
    );
    assert_eq!(h.count("scan_logs", "1 = 1"), 0);
}

#[test]
fn test_concurrent_scanners_advance_once() {
    let h = TestHarness::new();
    let order = h.order("Gus", 100.0);
    let workers: Vec<_> = (0..6)
        .map(|i| h.worker(&format!("C{i}"), "cutting", &format!("SC-C{i}")))
        .collect();

    let handles: Vec<_> = workers
        .iter()
        .map(|w| {
            let db = h.db.clone();
            let request = scan_by_worker(&order.qr_code, w.id);
            thread::spawn(move || process_scan(&db, &request, DEFAULT_MAX_ATTEMPTS).unwrap())
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let advanced = outcomes
        .iter()
        .filter(|o| matches!(o, ScanOutcome::Advanced { .. }))
        .count();
    assert_eq!(advanced, 1);
    assert_eq!(audit_repo::count_processes_for_order(&h.db, order.id).unwrap(), 1);
    assert_eq!(h.count("scan_logs", "is_success = 0"), 5);
}
