//! HTTP adapter for the listing endpoint.
//!
//! Timestamps arrive on the wire as strings; [`RawProduct::normalize`] turns
//! them into real dates before anything else sees the product.

use async_trait::async_trait;
use catalog_core::{ErrorResponse, Installment, ListingParams, ListingResponse, Price, Product};
use catalog_core::types::timestamp;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::view::ProductSource;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "CATALOG_API_URL";

/// Base URL used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Errors that can occur when fetching products.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL is not usable.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status}")]
    Api { status: u16, message: Option<String> },

    /// Response body was not a listing envelope.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A price validity date could not be parsed.
    #[error("Invalid timestamp {value:?} on product {code}: {source}")]
    InvalidTimestamp {
        code: String,
        value: String,
        source: chrono::ParseError,
    },
}

/// Product as it arrives from the API, with dates still as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub image: String,
    pub code: String,
    pub name: String,
    pub color: String,
    pub capacity: f64,
    pub dimensions: String,
    pub features: Vec<String>,
    pub energy_class: String,
    pub price: RawPrice,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrice {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub currency: String,
    pub installment: Installment,
    pub valid_from: String,
    pub valid_to: String,
}

impl RawProduct {
    /// Convert the wire dates and produce a [`Product`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidTimestamp` if either validity date does
    /// not parse.
    pub fn normalize(self) -> Result<Product, ClientError> {
        let parse = |value: &str| {
            timestamp::parse(value).map_err(|source| ClientError::InvalidTimestamp {
                code: self.code.clone(),
                value: value.to_owned(),
                source,
            })
        };
        let valid_from = parse(&self.price.valid_from)?;
        let valid_to = parse(&self.price.valid_to)?;

        Ok(Product {
            image: self.image,
            code: self.code,
            name: self.name,
            color: self.color,
            capacity: self.capacity,
            dimensions: self.dimensions,
            features: self.features,
            energy_class: self.energy_class,
            price: Price {
                value: self.price.value,
                currency: self.price.currency,
                installment: self.price.installment,
                valid_from,
                valid_to,
            },
        })
    }
}

/// Client for the catalog listing API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    products_url: Url,
}

impl CatalogClient {
    /// Create a client for the API rooted at `base_url` (e.g. `http://host/api`).
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let products_url = base.join("products")?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("catalog-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, products_url })
    }

    /// Create a client from `CATALOG_API_URL`, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns error if the configured URL is invalid.
    pub fn from_env() -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv();
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url)
    }

    /// Full request URL for `params`; absent parameters are omitted.
    #[must_use]
    pub fn products_url(&self, params: &ListingParams) -> Url {
        let mut url = self.products_url.clone();
        let pairs = params.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    /// Fetch the products matching `params`, with dates normalized.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the API answers with a non-success
    /// status, or the body cannot be decoded.
    pub async fn fetch_products(&self, params: &ListingParams) -> Result<Vec<Product>, ClientError> {
        let url = self.products_url(params);
        tracing::debug!(%url, "Fetching products");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .map(|e| e.error);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let listing: ListingResponse<RawProduct> = serde_json::from_slice(&body)?;
        tracing::debug!(count = listing.count, "Fetched products");

        listing
            .data
            .into_iter()
            .map(RawProduct::normalize)
            .collect()
    }
}

#[async_trait]
impl ProductSource for CatalogClient {
    async fn fetch_products(&self, params: &ListingParams) -> Result<Vec<Product>, ClientError> {
        Self::fetch_products(self, params).await
    }
}
