//! Scan-event processing.
//!
//! A scan names an order (by token) and a worker (by scanner code or id).
//! The worker's station decides whether the order advances; every
//! attributable attempt lands in the scan ledger either way.

pub mod actor;
pub mod error;
pub mod processor;
pub mod store;
pub mod token;

pub use error::{ScanError, ScanRejection};
pub use processor::{process_scan, ScanOutcome, ScanRequest, DEFAULT_MAX_ATTEMPTS};
pub use store::{ScanStore, TransitionCommit};
pub use token::parse_order_token;
