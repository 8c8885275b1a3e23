//! HTTP middleware for the listing server.
//!
//! # Layers (outermost first)
//!
//! - Sentry hub and HTTP transaction layers
//! - `TraceLayer` request spans
//! - Request ID (`x-request-id`)
//! - CORS, any origin

pub mod request_id;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// CORS policy: any origin may read the catalog.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}
