//! Product and customer endpoints.

use axum::extract::State;
use axum::Json;
use furntrace::catalog::{self, CatalogQuery, CustomerPage, CustomerRequest, ProductRequest};
use furntrace::db::catalog_repo::{Customer, Product};

use super::{blocking, Deleted};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    blocking(move || catalog::create_product(&state.db, &request))
        .await
        .map(Json)
}

pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    blocking(move || catalog::list_products(&state.db, &query))
        .await
        .map(Json)
}

pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    blocking(move || catalog::update_product(&state.db, id, &request))
        .await
        .map(Json)
}

pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Deleted>, ApiError> {
    blocking(move || catalog::delete_product(&state.db, id)).await?;
    Ok(Json(Deleted::new("Product")))
}

pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<Json<Customer>, ApiError> {
    blocking(move || catalog::create_customer(&state.db, &request))
        .await
        .map(Json)
}

pub async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogQuery>,
) -> Result<Json<CustomerPage>, ApiError> {
    blocking(move || catalog::list_customers(&state.db, &query))
        .await
        .map(Json)
}

pub async fn update_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<Json<Customer>, ApiError> {
    blocking(move || catalog::update_customer(&state.db, id, &request))
        .await
        .map(Json)
}

pub async fn delete_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Deleted>, ApiError> {
    blocking(move || catalog::delete_customer(&state.db, id)).await?;
    Ok(Json(Deleted::new("Customer")))
}
