//! List products through the HTTP API.

use catalog_client::CatalogClient;
use catalog_core::ListingParams;

use super::CommandError;

/// Fetch products matching `params` and log one line per product.
///
/// # Errors
///
/// Returns error if `CATALOG_API_URL` is invalid or the request fails.
pub async fn run(params: &ListingParams) -> Result<(), CommandError> {
    let client = CatalogClient::from_env()?;
    let products = client.fetch_products(params).await?;

    tracing::info!(count = products.len(), "Products");
    for product in &products {
        tracing::info!(
            code = %product.code,
            name = %product.name,
            capacity = product.capacity,
            energy_class = %product.energy_class,
            price = %product.price.value,
            currency = %product.price.currency,
            "  -"
        );
    }

    Ok(())
}
