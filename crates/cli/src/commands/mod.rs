//! Command implementations.

pub mod list;
pub mod migrate;
pub mod seed;

use catalog_client::ClientError;
use catalog_server::config::ConfigError;
use catalog_server::db::RepositoryError;
use thiserror::Error;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Product {0} has validFrom after validTo")]
    InvalidValidity(String),

    #[error("Product code {0} appears more than once")]
    DuplicateCode(String),
}
