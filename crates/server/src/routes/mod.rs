//! HTTP route handlers for the listing server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (product store reachable)
//!
//! # API
//! GET  /api/products           - Filtered, sorted product listing
//! ```

pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the JSON API router, mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/products", get(products::index))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::live))
        .route("/ready", get(health::ready))
}
