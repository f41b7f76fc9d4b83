pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod orders;
pub mod paging;
pub mod pipeline;
pub mod scan;
pub mod stats;
pub mod telemetry;
pub mod workers;

pub use config::{load_config, Config};
pub use db::Database;
pub use error::{ConfigError, FurntraceError, Result, ValidationError};
pub use pipeline::{transition, OrderStatus, Station};
pub use scan::{process_scan, ScanError, ScanOutcome, ScanRejection, ScanRequest, ScanStore};
