//! The order lifecycle state machine.

use super::station::{OrderStatus, Station};

/// Fixed `(trigger status, station) -> next status` table.
const TRANSITIONS: [(Station, OrderStatus, OrderStatus); 5] = [
    (
        Station::Cutting,
        OrderStatus::AwaitingCutting,
        OrderStatus::AwaitingTrimming,
    ),
    (
        Station::Trimming,
        OrderStatus::AwaitingTrimming,
        OrderStatus::AwaitingCovering,
    ),
    (
        Station::Covering,
        OrderStatus::AwaitingCovering,
        OrderStatus::AwaitingDelivery,
    ),
    (
        Station::Delivery,
        OrderStatus::AwaitingDelivery,
        OrderStatus::AwaitingPayment,
    ),
    (
        Station::Payment,
        OrderStatus::AwaitingPayment,
        OrderStatus::Completed,
    ),
];

/// Computes the status an order moves to when scanned at `station`.
///
/// Returns `current` unchanged when the station's trigger status is not the
/// order's current status. Re-scanning at the same station after a
/// successful advance is therefore a no-op.
pub fn transition(current: OrderStatus, station: Station) -> OrderStatus {
    TRANSITIONS
        .iter()
        .find(|(s, trigger, _)| *s == station && *trigger == current)
        .map(|(_, _, next)| *next)
        .unwrap_or(current)
}

/// The station whose scan advances an order out of `status`, if any.
pub fn station_for(status: OrderStatus) -> Option<Station> {
    TRANSITIONS
        .iter()
        .find(|(_, trigger, _)| *trigger == status)
        .map(|(station, _, _)| *station)
}
