//! HTTP API
//!
//! - [`health`] - liveness
//! - [`members`] - employee CRUD, search and reports
//! - [`departments`] / [`locations`] - reference data
//! - [`org_chart`] - reporting forest
//! - [`import`] - CSV import and relink

pub mod departments;
pub mod health;
pub mod import;
pub mod locations;
pub mod members;
pub mod org_chart;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use crate::middleware;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(members::router())
        .merge(departments::router())
        .merge(locations::router())
        .merge(org_chart::router())
        .merge(import::router())
}

/// Build the application with all middleware.
///
/// Used by the HTTP server and by integration tests driving it with `oneshot`.
pub fn build_app() -> Router<ServerState> {
    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Request logging with request id
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Trace - Request tracing spans
        .layer(TraceLayer::new_for_http())
}
