//! `POST /api/scan`.

use axum::extract::State;
use axum::Json;
use furntrace::db::order_repo::Order;
use furntrace::{process_scan, OrderStatus, ScanOutcome, ScanRequest};
use serde::Serialize;

use super::blocking;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::server::AppState;

/// Body of a successful scan. The status pair is present only when the
/// order moved.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub message: String,
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<OrderStatus>,
}

impl TryFrom<ScanOutcome> for ScanResponse {
    type Error = ApiError;

    fn try_from(outcome: ScanOutcome) -> Result<Self, Self::Error> {
        match outcome {
            ScanOutcome::Advanced {
                order,
                prev_status,
                new_status,
                message,
            } => Ok(Self {
                message,
                order,
                prev_status: Some(prev_status),
                new_status: Some(new_status),
            }),
            ScanOutcome::NoOp { order, message } => Ok(Self {
                message,
                order,
                prev_status: None,
                new_status: None,
            }),
            ScanOutcome::Rejected(rejection) => Err(rejection.into()),
        }
    }
}

pub async fn handle_scan(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let db = state.db.clone();
    let max_attempts = state.config.scan.max_attempts;
    let outcome = blocking(move || process_scan(&db, &request, max_attempts)).await?;
    ScanResponse::try_from(outcome).map(Json)
}
