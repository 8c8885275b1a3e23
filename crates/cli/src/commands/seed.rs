//! Seed the catalog from a YAML file.
//!
//! Seeding replaces the catalog: every stored product is deleted, then the
//! file's products are inserted in file order. The file is parsed and
//! validated before the database is touched.

use std::collections::HashSet;
use std::path::Path;

use catalog_core::Product;
use catalog_server::db::{self, PgProductStore, ProductStore};
use catalog_server::config;
use tracing::{error, info};

use super::CommandError;

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub deleted: u64,
    pub inserted: u64,
}

/// Seed the configured database from `file_path`.
///
/// # Errors
///
/// Returns error if the file cannot be read or validated, or if a database
/// operation fails.
pub async fn run(file_path: &str) -> Result<(), CommandError> {
    info!(path = %file_path, "Loading products from file");
    let products = load(Path::new(file_path)).await?;
    info!(products = products.len(), "Seed file validated");

    let database_url = config::database_url_from_env()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = replace_catalog(&PgProductStore::new(pool), &products).await?;

    info!("Seeding complete!");
    info!("  Products deleted: {}", summary.deleted);
    info!("  Products inserted: {}", summary.inserted);
    Ok(())
}

/// Read and validate a seed file.
async fn load(path: &Path) -> Result<Vec<Product>, CommandError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse(&content)
}

/// Parse seed YAML, rejecting inverted validity windows and repeated codes.
fn parse(content: &str) -> Result<Vec<Product>, CommandError> {
    let products: Vec<Product> = serde_yaml::from_str(content)?;

    if let Some(bad) = products.iter().find(|p| !p.price.has_ordered_validity()) {
        error!(code = %bad.code, "validFrom is after validTo");
        return Err(CommandError::InvalidValidity(bad.code.clone()));
    }

    let mut seen = HashSet::with_capacity(products.len());
    if let Some(repeated) = products.iter().find(|p| !seen.insert(p.code.as_str())) {
        error!(code = %repeated.code, "Product code appears more than once");
        return Err(CommandError::DuplicateCode(repeated.code.clone()));
    }

    Ok(products)
}

/// Delete every product in `store`, then insert `products`.
async fn replace_catalog(
    store: &dyn ProductStore,
    products: &[Product],
) -> Result<SeedSummary, CommandError> {
    let deleted = store.delete_many().await?;
    info!(deleted, "Existing products deleted");

    let inserted = store.insert_many(products).await?;
    info!(inserted, "Seed data inserted");

    Ok(SeedSummary { deleted, inserted })
}
