//! Fixed station and status vocabularies of the production line.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A physical production stage. Workers and scanners are bound to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Station {
    Cutting,
    Trimming,
    Covering,
    /// Also accepted as `shipping`.
    #[serde(alias = "shipping")]
    Delivery,
    Payment,
}

impl Station {
    /// All stations in pipeline order.
    pub const ALL: [Station; 5] = [
        Station::Cutting,
        Station::Trimming,
        Station::Covering,
        Station::Delivery,
        Station::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Station::Cutting => "cutting",
            Station::Trimming => "trimming",
            Station::Covering => "covering",
            Station::Delivery => "delivery",
            Station::Payment => "payment",
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a station or status name outside the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Station {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cutting" => Ok(Station::Cutting),
            "trimming" => Ok(Station::Trimming),
            "covering" => Ok(Station::Covering),
            "delivery" | "shipping" => Ok(Station::Delivery),
            "payment" => Ok(Station::Payment),
            _ => Err(UnknownName {
                kind: "station",
                value: s.to_string(),
            }),
        }
    }
}

/// Order status. One more state than there are stations: the entry state
/// plus one state after each station boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    AwaitingCutting,
    AwaitingTrimming,
    AwaitingCovering,
    AwaitingDelivery,
    AwaitingPayment,
    Completed,
}

impl OrderStatus {
    /// All statuses in pipeline order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::AwaitingCutting,
        OrderStatus::AwaitingTrimming,
        OrderStatus::AwaitingCovering,
        OrderStatus::AwaitingDelivery,
        OrderStatus::AwaitingPayment,
        OrderStatus::Completed,
    ];

    /// Status assigned to newly created orders.
    pub const INITIAL: OrderStatus = OrderStatus::AwaitingCutting;

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingCutting => "awaiting-cutting",
            OrderStatus::AwaitingTrimming => "awaiting-trimming",
            OrderStatus::AwaitingCovering => "awaiting-covering",
            OrderStatus::AwaitingDelivery => "awaiting-delivery",
            OrderStatus::AwaitingPayment => "awaiting-payment",
            OrderStatus::Completed => "completed",
        }
    }

    /// Position in the pipeline, 0 for the entry state.
    pub fn ordinal(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or(Self::ALL.len())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownName {
                kind: "status",
                value: s.to_string(),
            })
    }
}
