//! Product listing handler.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use catalog_core::{ListingParams, ListingResponse, Product};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// List products matching the query parameters.
///
/// GET /api/products?search=&capacity=&energyClass=&feature=&sort=
///
/// Failures are not handled here; they propagate as [`crate::error::AppError`].
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<ListingResponse<Product>>> {
    let Query(params) = params?;
    let query = params.build_query();
    tracing::debug!(?query, "Built listing query");

    let products = state.products().find(&query).await?;
    tracing::info!(count = products.len(), "Listed products");

    Ok(Json(ListingResponse::new(products)))
}
