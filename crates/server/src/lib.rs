//! Appliance Catalog listing server library.
//!
//! This crate provides the listing API as a library, allowing it to be
//! tested and reused. The binary in `main.rs` wires it to configuration,
//! `PostgreSQL` and Sentry.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/health", routes::health_routes())
        .nest("/api", routes::api_routes())
        .layer(middleware::cors_layer())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
