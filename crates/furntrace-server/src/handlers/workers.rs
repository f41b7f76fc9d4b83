//! Worker administration endpoints.

use axum::extract::State;
use axum::Json;
use furntrace::db::worker_repo::Worker;
use furntrace::workers::{self, ListWorkersQuery, WorkerPage, WorkerRequest};

use super::{blocking, Deleted};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::AppState;

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<WorkerRequest>,
) -> Result<Json<Worker>, ApiError> {
    blocking(move || workers::create_worker(&state.db, &request))
        .await
        .map(Json)
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListWorkersQuery>,
) -> Result<Json<WorkerPage>, ApiError> {
    blocking(move || workers::list_workers(&state.db, &query))
        .await
        .map(Json)
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Worker>, ApiError> {
    blocking(move || workers::get_worker(&state.db, id)).await.map(Json)
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<WorkerRequest>,
) -> Result<Json<Worker>, ApiError> {
    blocking(move || workers::update_worker(&state.db, id, &request))
        .await
        .map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Deleted>, ApiError> {
    blocking(move || workers::delete_worker(&state.db, id)).await?;
    Ok(Json(Deleted::new("Worker")))
}
