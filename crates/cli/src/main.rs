//! Appliance Catalog CLI - migrations, seeding and listing.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! catalog migrate
//!
//! # Replace the stored catalog with the seed file
//! catalog seed --file crates/cli/seed/products.yaml
//!
//! # List products through the HTTP API
//! catalog list --search washer --capacity 8 --energy-class B
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Delete all products and insert the seed set
//! - `list` - Query `GET /api/products` and log the result

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catalog_core::ListingParams;

mod commands;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about = "Appliance catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Replace all stored products with the contents of a seed file
    Seed {
        /// Path to the YAML seed file
        #[arg(short, long, default_value = "crates/cli/seed/products.yaml")]
        file: String,
    },
    /// List products through the HTTP API
    List(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive pattern over code, name and features
    #[arg(short, long)]
    search: Option<String>,

    /// Exact capacity in kg
    #[arg(short, long)]
    capacity: Option<String>,

    /// Exact energy class
    #[arg(short, long)]
    energy_class: Option<String>,

    /// Exact feature entry
    #[arg(short, long)]
    feature: Option<String>,

    /// Sort key (`price` or `capacity`)
    #[arg(long)]
    sort: Option<String>,
}

impl From<ListArgs> for ListingParams {
    fn from(args: ListArgs) -> Self {
        Self {
            search: args.search,
            capacity: args.capacity,
            energy_class: args.energy_class,
            feature: args.feature,
            sort: args.sort,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::List(args) => commands::list::run(&args.into()).await?,
    }
    Ok(())
}
