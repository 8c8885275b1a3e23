//! Database migration command.
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/server/migrations/` and are embedded at build time.

use catalog_server::{config, db};

use super::CommandError;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns error if the URL is missing, the connection fails or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = config::database_url_from_env()?;

    tracing::info!("Connecting to catalog database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running catalog migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
