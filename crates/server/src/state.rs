//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::ProductStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The product store is injected
/// here so handlers never reach for a global connection.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    products: Arc<dyn ProductStore>,
}

impl AppState {
    /// Create a new application state around a product store.
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { products }),
        }
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }
}
