//! Statistics over data produced through the public operations.

mod common;

use chrono::{TimeZone, Utc};

use common::{scan_by_scanner, OrderBuilder, TestHarness};
use furntrace::orders::{self, LineItemRequest, UpdateOrderRequest};
use furntrace::stats::{self, Period, StationLimits, WorkerStatsQuery};
use furntrace::workers;

#[test]
fn test_empty_week_trend() {
    let h = TestHarness::new();
    let now = Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).unwrap();
    let trend = stats::trend(&h.db, Period::Week, &now).unwrap();

    assert_eq!(trend.len(), 7);
    assert_eq!(trend[0].date, "2026-06-09");
    assert_eq!(trend[6].date, "2026-06-15");
    assert!(trend.iter().all(|b| b.count == 0 && b.revenue == 0.0));
}

#[test]
fn test_replacing_items_recomputes_amount() {
    let h = TestHarness::new();
    let chair = h.product("Chair");
    let table = h.product("Table");
    let order = orders::create_order(
        &h.db,
        &OrderBuilder::new("Hank").item(chair, 2, 100.0).item(table, 1, 300.0).build(),
    )
    .unwrap();
    assert_eq!(order.amount, 500.0);

    let updated = orders::update_order(
        &h.db,
        order.id,
        &UpdateOrderRequest {
            customer_name: "Hank".to_string(),
            items: Some(vec![LineItemRequest {
                product_id: chair,
                quantity: 4,
                unit_price: 20.0,
                ..Default::default()
            }]),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(updated.amount, 80.0);
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].total_price, 80.0);
}

#[test]
fn test_dashboard_ignores_deleted_orders() {
    let h = TestHarness::new();
    let kept = h.order("Ivy", 200.0);
    let gone = h.order("Jack", 900.0);
    orders::delete_order(&h.db, gone.id).unwrap();

    let stats = stats::dashboard_stats(&h.db, Period::Week, &Utc::now()).unwrap();
    assert_eq!(stats.summary.total, 1);
    assert_eq!(stats.summary.pending, 1);
    assert_eq!(stats.summary.revenue, 200.0);
    assert_eq!(stats.top_customers.len(), 1);
    assert_eq!(stats.top_customers[0].name, kept.customer_name);
    assert_eq!(stats.trend.last().map(|b| b.count), Some(1));
    assert_eq!(stats.status_dist.len(), 1);
    assert_eq!(stats.status_dist[0].count, 1);
}

#[test]
fn test_station_and_worker_reports_after_scans() {
    let h = TestHarness::new();
    let a = h.order("Kim", 100.0);
    let b = h.order("Lee", 100.0);
    let cutter = h.worker("Ma", "cutting", "SC-CUT");
    let trimmer = h.worker("Niu", "trimming", "SC-TRIM");

    h.scan(&scan_by_scanner(&a.qr_code, "SC-CUT"));
    h.scan(&scan_by_scanner(&b.qr_code, "SC-CUT"));
    h.scan(&scan_by_scanner(&a.qr_code, "SC-TRIM"));
    h.scan(&scan_by_scanner(&a.qr_code, "SC-TRIM"));

    let now = Utc::now();
    let station = stats::station_stats(&h.db, StationLimits::default(), &now).unwrap();
    assert_eq!(station.today_count, 3);
    assert_eq!(station.leaderboard[0].worker_id, cutter.id);
    assert_eq!(station.leaderboard[0].count, 2);
    assert_eq!(station.recent_logs.len(), 4);
    assert_eq!(station.error_logs.len(), 1);

    // Deleting a worker keeps their history in the report.
    workers::delete_worker(&h.db, trimmer.id).unwrap();
    let report = stats::worker_report(&h.db, &WorkerStatsQuery::default(), &now).unwrap();
    assert_eq!(report.daily_work.len(), 7);
    assert_eq!(report.daily_work.last().map(|d| d.count), Some(3));
    assert_eq!(report.worker_totals.len(), 2);
    assert_eq!(report.recent_logs.len(), 3);

    let only_trimmer = WorkerStatsQuery {
        worker_id: Some(trimmer.id),
        ..Default::default()
    };
    let report = stats::worker_report(&h.db, &only_trimmer, &now).unwrap();
    assert_eq!(report.worker_totals.len(), 1);
    assert_eq!(report.station_work.len(), 1);
    assert_eq!(report.station_work[0].station, "trimming");
}
