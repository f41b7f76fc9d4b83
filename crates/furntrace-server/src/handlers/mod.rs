//! Request handlers, organized by domain:
//! - `scan`: scanner submissions
//! - `stats`: dashboards and reports
//! - `orders`, `workers`, `catalog`: administration

pub mod catalog;
pub mod orders;
pub mod scan;
pub mod stats;
pub mod workers;

use serde::Serialize;

use crate::error::ApiError;

/// Runs a blocking store call on tokio's blocking pool.
pub(crate) async fn blocking<T, E, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("request task failed: {e}")))?
        .map_err(Into::into)
}

/// Body of the delete endpoints.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
}

impl Deleted {
    pub(crate) fn new(entity: &str) -> Self {
        Self {
            message: format!("{entity} deleted successfully"),
        }
    }
}
