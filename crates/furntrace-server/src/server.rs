//! Router assembly and the HTTP listener.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use furntrace::{Config, Database};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{catalog, orders, scan, stats, workers};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the full router: the API under `/api` plus `/health`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/scan", post(scan::handle_scan))
        .route("/dashboard/stats", get(stats::dashboard))
        .route("/station/stats", get(stats::station))
        .route("/workers/stats", get(stats::workers))
        .route("/orders", post(orders::create).get(orders::list))
        .route(
            "/orders/{id}",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .route("/orders/{id}/status", put(orders::override_status))
        .route("/workers", post(workers::create).get(workers::list))
        .route(
            "/workers/{id}",
            get(workers::get).put(workers::update).delete(workers::delete),
        )
        .route(
            "/products",
            post(catalog::create_product).get(catalog::list_products),
        )
        .route(
            "/products/{id}",
            put(catalog::update_product).delete(catalog::delete_product),
        )
        .route(
            "/customers",
            post(catalog::create_customer).get(catalog::list_customers),
        )
        .route(
            "/customers/{id}",
            put(catalog::update_customer).delete(catalog::delete_customer),
        );

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serves `state` on the configured address until `shutdown` resolves.
pub async fn serve<F>(state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&bind_address).await?;

    tracing::info!("furntrace API listening on {}", bind_address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
