//! HTTP API server with observability for the order service.
//!
//! Provides REST endpoints for users and orders, liveness and readiness
//! probes, structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::{
    InMemoryHealthCheck, InMemoryOrderRepository, InMemoryUserRepository, PgPool,
    PostgresHealthCheck, PostgresOrderRepository, PostgresUserRepository,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use usecase::{OrderRepository, OrderService, UserRepository, UserService};

pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<U, O>(state: Arc<AppState<U, O>>, metrics_handle: PrometheusHandle) -> Router
where
    U: UserRepository + 'static,
    O: OrderRepository + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/livez", get(routes::health::live))
        .route("/healthz", get(routes::health::ready::<U, O>))
        .route("/users", post(routes::users::create::<U, O>))
        .route("/users/{id}", get(routes::users::get::<U, O>))
        .route("/users/{id}/avatar", put(routes::users::update_avatar::<U, O>))
        .route("/orders", post(routes::orders::create::<U, O>))
        .route("/orders/{id}", get(routes::orders::get::<U, O>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
}

/// Application state backed by in-memory storage.
pub type InMemoryState = AppState<InMemoryUserRepository, InMemoryOrderRepository>;

/// Application state backed by PostgreSQL.
pub type PostgresState = AppState<PostgresUserRepository, PostgresOrderRepository>;

/// Builds state over fresh in-memory repositories.
pub fn create_in_memory_state(deadline: Duration) -> Arc<InMemoryState> {
    let state = AppState::new(
        UserService::with_deadline(InMemoryUserRepository::new(), deadline),
        OrderService::with_deadline(InMemoryOrderRepository::new(), deadline),
    )
    .with_health_check(Arc::new(InMemoryHealthCheck::new()));

    Arc::new(state)
}

/// Builds state over a PostgreSQL pool.
pub fn create_postgres_state(pool: PgPool, deadline: Duration) -> Arc<PostgresState> {
    let state = AppState::new(
        UserService::with_deadline(PostgresUserRepository::new(pool.clone()), deadline),
        OrderService::with_deadline(PostgresOrderRepository::new(pool.clone()), deadline),
    )
    .with_health_check(Arc::new(PostgresHealthCheck::new(pool)));

    Arc::new(state)
}
