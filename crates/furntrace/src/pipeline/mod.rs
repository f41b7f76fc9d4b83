pub mod station;
pub mod transition;

pub use station::{OrderStatus, Station, UnknownName};
pub use transition::{station_for, transition};
