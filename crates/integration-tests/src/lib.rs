//! Integration tests for the appliance catalog.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no external services)
//! cargo test -p catalog-integration-tests
//!
//! # Include the PostgreSQL-backed tests
//! CATALOG_DATABASE_URL=postgres://... cargo test -p catalog-integration-tests -- --include-ignored
//! ```
//!
//! Every test gets its own server on an ephemeral port, so tests run in
//! parallel without sharing state.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use catalog_client::CatalogClient;
use catalog_core::Product;
use catalog_server::db::{MemoryProductStore, ProductStore};
use catalog_server::state::AppState;

/// The bundled seed file.
const SEED_YAML: &str = include_str!("../../cli/seed/products.yaml");

/// The six seeded washing machines, in seed order.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    serde_yaml::from_str(SEED_YAML).expect("bundled seed file is valid")
}

/// A listing server running in the background of the current test runtime.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: CatalogClient,
}

impl TestServer {
    /// Serve `store` on `127.0.0.1:0`.
    pub async fn spawn(store: Arc<dyn ProductStore>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = catalog_server::app(AppState::new(store));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        let client = CatalogClient::new(&format!("http://{addr}/api"))
            .expect("Failed to create catalog client");

        Self { addr, client }
    }

    /// Serve the seed catalog from memory.
    pub async fn seeded() -> Self {
        Self::spawn(Arc::new(MemoryProductStore::with_products(seed_products()))).await
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}
