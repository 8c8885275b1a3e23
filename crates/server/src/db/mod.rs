//! Product persistence.
//!
//! The listing handler depends on the [`ProductStore`] trait only, so the
//! store is injected through [`crate::state::AppState`] rather than reached
//! through a global connection.
//!
//! # Implementations
//!
//! - [`PgProductStore`] - `PostgreSQL` via sqlx, table `catalog.product`
//! - [`MemoryProductStore`] - in-process store used by tests and demos
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```

pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use catalog_core::{ListingQuery, Product};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryProductStore;
pub use products::PgProductStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A search pattern could not be compiled.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate product code).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Document-style product persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Return every product matching the query's filter, ordered by its sort
    /// key or by insertion order when none is given.
    async fn find(&self, query: &ListingQuery) -> Result<Vec<Product>, RepositoryError>;

    /// Insert products in one batch. Fails without inserting anything if a
    /// code is already present or repeated in the batch.
    async fn insert_many(&self, products: &[Product]) -> Result<u64, RepositoryError>;

    /// Remove every product, returning how many were removed.
    async fn delete_many(&self) -> Result<u64, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
