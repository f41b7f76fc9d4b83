//! Order administration endpoints.

use axum::extract::State;
use axum::Json;
use furntrace::db::order_repo::Order;
use furntrace::orders::{
    self, CreateOrderRequest, ListOrdersQuery, OrderPage, StatusOverrideRequest,
    UpdateOrderRequest,
};

use super::{blocking, Deleted};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::AppState;

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    blocking(move || orders::create_order(&state.db, &request))
        .await
        .map(Json)
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> Result<Json<OrderPage>, ApiError> {
    blocking(move || orders::list_orders(&state.db, &query))
        .await
        .map(Json)
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Order>, ApiError> {
    blocking(move || orders::get_order(&state.db, id)).await.map(Json)
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    blocking(move || orders::update_order(&state.db, id, &request))
        .await
        .map(Json)
}

pub async fn override_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<StatusOverrideRequest>,
) -> Result<Json<Order>, ApiError> {
    blocking(move || orders::override_status(&state.db, id, &request))
        .await
        .map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Deleted>, ApiError> {
    blocking(move || orders::delete_order(&state.db, id)).await?;
    Ok(Json(Deleted::new("Order")))
}
