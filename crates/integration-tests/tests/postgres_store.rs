//! Listing API against a real `PostgreSQL` store.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `CATALOG_DATABASE_URL` (or `DATABASE_URL`) pointing at it
//!
//! They run the migrations and replace the contents of `catalog.product`.
//! Run with: `cargo test -p catalog-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use catalog_core::ListingParams;
use catalog_integration_tests::{TestServer, seed_products};
use catalog_server::config;
use catalog_server::db::{self, PgProductStore, ProductStore, RepositoryError};

async fn seeded_store() -> PgProductStore {
    let url = config::database_url_from_env().expect("CATALOG_DATABASE_URL not set");
    let pool = db::create_pool(&url).await.expect("Failed to connect");
    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let store = PgProductStore::new(pool);
    store.delete_many().await.unwrap();
    store.insert_many(&seed_products()).await.unwrap();
    store
}

async fn codes(server: &TestServer, params: ListingParams) -> Vec<String> {
    server
        .client
        .fetch_products(&params)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.code)
        .collect()
}

// Both scenarios share one table, so they run as a single test.
#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_postgres_listing_matches_memory_semantics() {
    let store = seeded_store().await;

    let duplicate = store.insert_many(&seed_products()[..1]).await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));

    let server = TestServer::spawn(Arc::new(store)).await;

    assert_eq!(
        server
            .client
            .fetch_products(&ListingParams::default())
            .await
            .unwrap(),
        seed_products()
    );

    let params = ListingParams::default()
        .with_capacity("8")
        .with_energy_class("B");
    assert_eq!(codes(&server, params).await, ["WW90T754ABF"]);

    assert_eq!(
        codes(&server, ListingParams::default().with_search("QUICKDRIVE"))
            .await
            .len(),
        6
    );

    assert_eq!(
        codes(&server, ListingParams::default().with_feature("Drzwi AddWash™")).await,
        [
            "WW90T754ABT",
            "WW90T754ABC",
            "WW90T754ABD",
            "WW90T754ABE",
            "WW90T754ABF"
        ]
    );

    assert_eq!(
        codes(&server, ListingParams::default().with_sort("price")).await,
        [
            "WW90T754ABC",
            "WW90T754ABD",
            "WW90T754ABE",
            "WW90T754ABF",
            "WW90T754ABH",
            "WW90T754ABT"
        ]
    );

    assert!(
        server
            .client
            .fetch_products(&ListingParams::default().with_search("("))
            .await
            .is_err()
    );
}
