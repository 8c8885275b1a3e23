//! End-to-end tests of the listing API through the catalog client.
//!
//! Each test starts the real router on an ephemeral port, backed by the
//! in-memory store loaded with the seed catalog.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use catalog_client::{ClientError, ListingState, ProductListing};
use catalog_core::ListingParams;
use catalog_integration_tests::{TestServer, seed_products};
use catalog_server::db::MemoryProductStore;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;

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

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_lists_seed_catalog_in_insertion_order() {
    let server = TestServer::seeded().await;
    let products = server
        .client
        .fetch_products(&ListingParams::default())
        .await
        .unwrap();

    assert_eq!(products, seed_products());
    assert_eq!(
        products[0].price.valid_from,
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_envelope_shape_on_the_wire() {
    let server = TestServer::seeded().await;
    let body: serde_json::Value = reqwest::get(server.url("/api/products?energyClass=C"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["code"], "WW90T754ABE");
    assert_eq!(body["data"][0]["price"]["validTo"], "2021-12-31T00:00:00.000Z");
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_search_matches_code_name_and_features() {
    let server = TestServer::seeded().await;

    assert_eq!(
        codes(&server, ListingParams::default().with_search("abf")).await,
        ["WW90T754ABF"]
    );
    assert_eq!(
        codes(&server, ListingParams::default().with_search("quickdrive"))
            .await
            .len(),
        6
    );
    assert_eq!(
        codes(&server, ListingParams::default().with_search("addwash")).await,
        [
            "WW90T754ABT",
            "WW90T754ABC",
            "WW90T754ABD",
            "WW90T754ABE",
            "WW90T754ABF"
        ]
    );
}

#[tokio::test]
async fn test_combined_filters_are_conjunctive() {
    let server = TestServer::seeded().await;

    let params = ListingParams::default()
        .with_capacity("8")
        .with_energy_class("B");
    assert_eq!(codes(&server, params).await, ["WW90T754ABF"]);

    let params = ListingParams::default()
        .with_search("washer")
        .with_capacity("8")
        .with_energy_class("B");
    assert!(codes(&server, params).await.is_empty());
}

#[tokio::test]
async fn test_feature_filter_is_exact_membership() {
    let server = TestServer::seeded().await;

    assert_eq!(
        codes(
            &server,
            ListingParams::default().with_feature("Wyświetlacz elektroniczny")
        )
        .await,
        [
            "WW90T754ABT",
            "WW90T754ABH",
            "WW90T754ABC",
            "WW90T754ABE",
            "WW90T754ABF"
        ]
    );
    assert!(
        codes(&server, ListingParams::default().with_feature("Wyświetlacz"))
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_unparsable_capacity_matches_nothing() {
    let server = TestServer::seeded().await;
    assert!(
        codes(&server, ListingParams::default().with_capacity("abc"))
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_empty_params_are_ignored() {
    let server = TestServer::seeded().await;
    let params = ListingParams::default()
        .with_search("")
        .with_energy_class("");
    assert_eq!(codes(&server, params).await.len(), 6);
}

// ============================================================================
// Sorting
// ============================================================================

#[tokio::test]
async fn test_sort_by_price_ascending_with_stable_ties() {
    let server = TestServer::seeded().await;
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
}

#[tokio::test]
async fn test_sort_by_capacity_ascending() {
    let server = TestServer::seeded().await;
    assert_eq!(
        codes(&server, ListingParams::default().with_sort("capacity")).await,
        [
            "WW90T754ABC",
            "WW90T754ABF",
            "WW90T754ABT",
            "WW90T754ABD",
            "WW90T754ABH",
            "WW90T754ABE"
        ]
    );
}

#[tokio::test]
async fn test_unknown_sort_key_keeps_natural_order() {
    let server = TestServer::seeded().await;
    assert_eq!(
        codes(&server, ListingParams::default().with_sort("name")).await,
        codes(&server, ListingParams::default()).await
    );
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_invalid_pattern_is_generic_server_error() {
    let server = TestServer::seeded().await;
    let err = server
        .client
        .fetch_products(&ListingParams::default().with_search("("))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Api { status: 500, message: Some(ref m) } if m == "Server Error"
    ));
}

#[tokio::test]
async fn test_duplicate_query_param_is_generic_server_error() {
    let server = TestServer::seeded().await;
    let resp = reqwest::get(server.url("/api/products?sort=price&sort=capacity"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "success": false, "error": "Server Error" })
    );
}

// ============================================================================
// Plumbing
// ============================================================================

#[tokio::test]
async fn test_cors_and_request_id_headers() {
    let server = TestServer::seeded().await;
    let resp = reqwest::Client::new()
        .get(server.url("/api/products"))
        .header("origin", "http://localhost:3000")
        .header("x-request-id", "it-42")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.headers()["x-request-id"], "it-42");
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::spawn(Arc::new(MemoryProductStore::new())).await;

    let live = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(live.status(), StatusCode::OK);

    let ready = reqwest::get(server.url("/health/ready")).await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}

// ============================================================================
// Listing view over the live API
// ============================================================================

#[tokio::test]
async fn test_listing_view_follows_criteria() {
    let server = TestServer::seeded().await;
    let mut listing = ProductListing::new(server.client.clone());

    let state = listing
        .set_filters(ListingParams::default().with_energy_class("A"))
        .await;
    assert!(matches!(state, ListingState::Populated(p) if p.len() == 3));

    let html = listing.render().unwrap();
    assert!(html.contains(r#"data-code="WW90T754ABC""#));
    assert!(html.contains("Pokaż więcej"));

    let state = listing
        .set_filters(ListingParams::default().with_energy_class("D"))
        .await;
    assert_eq!(state, &ListingState::Empty);
    assert!(
        listing
            .render()
            .unwrap()
            .contains("Brak produktów spełniających kryteria wyszukiwania")
    );

    let state = listing
        .set_filters(ListingParams::default().with_search("["))
        .await;
    assert_eq!(state, &ListingState::Error);
    assert!(
        listing
            .render()
            .unwrap()
            .contains("Nie udało się załadować produktów")
    );
}
