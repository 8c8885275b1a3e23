//! Product listing view.
//!
//! [`ProductListing`] owns the current filter criteria and the display state.
//! Every change of criteria triggers a fresh fetch. Fetches are tagged with a
//! [`FetchTicket`]; only the outcome of the most recent ticket is applied, so
//! a slow response to old criteria can never overwrite a newer one.

use askama::Template;
use async_trait::async_trait;
use catalog_core::{ListingParams, Product};
use rust_decimal::Decimal;

use crate::api::ClientError;

/// Shown while a fetch is in flight.
pub const LOADING_MESSAGE: &str = "Ładowanie...";

/// Shown when the last fetch failed.
pub const ERROR_MESSAGE: &str = "Nie udało się załadować produktów";

/// Shown when the last fetch returned no products.
pub const EMPTY_MESSAGE: &str = "Brak produktów spełniających kryteria wyszukiwania";

/// Label of the (inert) control under the grid.
pub const LOAD_MORE_LABEL: &str = "Pokaż więcej";

/// Anything that can answer a listing request.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self, params: &ListingParams) -> Result<Vec<Product>, ClientError>;
}

/// What the listing currently displays.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    Loading,
    Error,
    Empty,
    Populated(Vec<Product>),
}

/// Handle for one fetch started by [`ProductListing::begin`].
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    params: ListingParams,
}

impl FetchTicket {
    /// Criteria this fetch was started with.
    #[must_use]
    pub const fn params(&self) -> &ListingParams {
        &self.params
    }
}

/// Listing view over a [`ProductSource`].
pub struct ProductListing<S> {
    source: S,
    filters: ListingParams,
    state: ListingState,
    generation: u64,
}

impl<S: ProductSource> ProductListing<S> {
    /// A listing with no criteria, in the loading state until the first fetch completes.
    pub fn new(source: S) -> Self {
        Self {
            source,
            filters: ListingParams::default(),
            state: ListingState::Loading,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ListingState {
        &self.state
    }

    #[must_use]
    pub const fn filters(&self) -> &ListingParams {
        &self.filters
    }

    /// Replace the criteria and fetch.
    pub async fn set_filters(&mut self, filters: ListingParams) -> &ListingState {
        let ticket = self.begin(filters);
        let outcome = self.source.fetch_products(ticket.params()).await;
        self.complete(ticket, outcome);
        &self.state
    }

    /// Re-run the fetch for the current criteria.
    pub async fn refresh(&mut self) -> &ListingState {
        let filters = self.filters.clone();
        self.set_filters(filters).await
    }

    /// Record new criteria and enter the loading state.
    ///
    /// Any ticket issued before this one becomes stale.
    pub fn begin(&mut self, filters: ListingParams) -> FetchTicket {
        self.generation += 1;
        self.filters = filters.clone();
        self.state = ListingState::Loading;

        FetchTicket {
            generation: self.generation,
            params: filters,
        }
    }

    /// Apply the outcome of a fetch. Returns `false` if the ticket was stale
    /// and the outcome was discarded.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Product>, ClientError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale listing response"
            );
            return false;
        }

        self.state = match outcome {
            Ok(products) if products.is_empty() => ListingState::Empty,
            Ok(products) => ListingState::Populated(products),
            Err(error) => {
                tracing::warn!(%error, "Failed to load products");
                ListingState::Error
            }
        };
        true
    }

    /// Render the current state as HTML.
    ///
    /// # Errors
    ///
    /// Returns error if template rendering fails.
    pub fn render(&self) -> Result<String, askama::Error> {
        let (notice, cards) = match &self.state {
            ListingState::Loading => (Some(Notice::info(LOADING_MESSAGE)), Vec::new()),
            ListingState::Error => (Some(Notice::error(ERROR_MESSAGE)), Vec::new()),
            ListingState::Empty => (Some(Notice::info(EMPTY_MESSAGE)), Vec::new()),
            ListingState::Populated(products) => {
                (None, products.iter().map(ProductCard::from).collect())
            }
        };

        ListingTemplate {
            notice,
            cards,
            load_more: LOAD_MORE_LABEL,
        }
        .render()
    }
}

/// Message displayed instead of the grid.
struct Notice {
    text: &'static str,
    tone: &'static str,
}

impl Notice {
    const fn info(text: &'static str) -> Self {
        Self {
            text,
            tone: "text-gray-700",
        }
    }

    const fn error(text: &'static str) -> Self {
        Self {
            text,
            tone: "text-red-600",
        }
    }
}

/// Product display data for the template.
pub struct ProductCard<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub image: &'a str,
    pub color: &'a str,
    pub capacity: String,
    pub dimensions: &'a str,
    pub features: String,
    pub energy_class: &'a str,
    pub price: String,
    pub installment: String,
    pub validity: String,
}

impl<'a> From<&'a Product> for ProductCard<'a> {
    fn from(product: &'a Product) -> Self {
        let price = &product.price;
        Self {
            code: &product.code,
            name: &product.name,
            image: &product.image,
            color: &product.color,
            capacity: product.capacity.to_string(),
            dimensions: &product.dimensions,
            features: product.features.join(", "),
            energy_class: &product.energy_class,
            price: format!("{} {}", format_amount(price.value), price.currency),
            installment: format!(
                "{} {} x {} rat",
                format_amount(price.installment.value),
                price.currency,
                price.installment.period
            ),
            validity: format!(
                "Cena obowiązuje: {} - {}",
                price.valid_from.format("%d.%m.%Y"),
                price.valid_to.format("%d.%m.%Y")
            ),
        }
    }
}

/// Two decimals with a decimal comma.
fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2)).replace('.', ",")
}

#[derive(Template)]
#[template(path = "listing.html")]
struct ListingTemplate<'a> {
    notice: Option<Notice>,
    cards: Vec<ProductCard<'a>>,
    load_more: &'static str,
}
