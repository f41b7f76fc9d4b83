//! HTTP surface of the furntrace production tracker.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{router, serve, AppState};
