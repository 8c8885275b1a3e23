//! In-process product store.
//!
//! Evaluates listing queries directly against a vector of products, with
//! the same semantics as the `PostgreSQL` store: patterns are
//! case-insensitive regular expressions, ties keep insertion order.

use std::cmp::Ordering;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tokio::sync::RwLock;

use catalog_core::{Clause, Field, ListingQuery, Product, Scalar, SortDirection, SortSpec};

use super::{ProductStore, RepositoryError};

/// Product store holding its documents in memory.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `products`, in insertion order.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find(&self, query: &ListingQuery) -> Result<Vec<Product>, RepositoryError> {
        let predicates = query
            .filter
            .clauses()
            .iter()
            .map(Predicate::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let mut found: Vec<Product> = self
            .products
            .read()
            .await
            .iter()
            .filter(|product| predicates.iter().all(|p| p.test(product)))
            .cloned()
            .collect();

        if let Some(sort) = query.sort {
            // Stable sort, so equal keys keep insertion order.
            found.sort_by(|a, b| compare(a, b, sort));
        }

        Ok(found)
    }

    async fn insert_many(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut stored = self.products.write().await;

        for (i, product) in products.iter().enumerate() {
            let repeated = products.iter().take(i).any(|p| p.code == product.code);
            if repeated || stored.iter().any(|p| p.code == product.code) {
                return Err(RepositoryError::Conflict(format!(
                    "product code already exists: {}",
                    product.code
                )));
            }
        }

        stored.extend_from_slice(products);
        Ok(products.len() as u64)
    }

    async fn delete_many(&self) -> Result<u64, RepositoryError> {
        let mut stored = self.products.write().await;
        let removed = stored.len() as u64;
        stored.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// A clause with its pattern compiled.
enum Predicate {
    Equals(Field, Scalar),
    Matches(Field, Regex),
    Contains(Field, String),
    AnyOf(Vec<Predicate>),
}

/// Borrowed view of a single product field.
enum Value<'a> {
    Text(&'a str),
    Number(f64),
    Amount(Decimal),
    List(&'a [String]),
}

impl Predicate {
    fn compile(clause: &Clause) -> Result<Self, RepositoryError> {
        Ok(match clause {
            Clause::Equals { field, value } => Self::Equals(*field, value.clone()),
            Clause::Matches { field, pattern } => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| RepositoryError::InvalidPattern(e.to_string()))?;
                Self::Matches(*field, regex)
            }
            Clause::Contains { field, value } => Self::Contains(*field, value.clone()),
            Clause::AnyOf(clauses) => Self::AnyOf(
                clauses
                    .iter()
                    .map(Self::compile)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    fn test(&self, product: &Product) -> bool {
        match self {
            Self::Equals(field, expected) => match (value(product, *field), expected) {
                (Value::Text(actual), Scalar::Text(expected)) => actual == expected,
                (Value::List(items), Scalar::Text(expected)) => items.contains(expected),
                #[allow(clippy::float_cmp)] // exact equality is the contract
                (Value::Number(actual), Scalar::Number(expected)) => actual == *expected,
                (Value::Amount(actual), Scalar::Number(expected)) => {
                    actual.to_f64() == Some(*expected)
                }
                _ => false,
            },
            Self::Matches(field, regex) => match value(product, *field) {
                Value::Text(text) => regex.is_match(text),
                Value::List(items) => items.iter().any(|item| regex.is_match(item)),
                Value::Number(n) => regex.is_match(&n.to_string()),
                Value::Amount(amount) => regex.is_match(&amount.to_string()),
            },
            Self::Contains(field, expected) => match value(product, *field) {
                Value::List(items) => items.contains(expected),
                Value::Text(text) => text == expected,
                Value::Number(_) | Value::Amount(_) => false,
            },
            Self::AnyOf(predicates) => predicates.iter().any(|p| p.test(product)),
        }
    }
}

fn value(product: &Product, field: Field) -> Value<'_> {
    match field {
        Field::Code => Value::Text(&product.code),
        Field::Name => Value::Text(&product.name),
        Field::Features => Value::List(&product.features),
        Field::Capacity => Value::Number(product.capacity),
        Field::EnergyClass => Value::Text(&product.energy_class),
        Field::PriceValue => Value::Amount(product.price.value),
    }
}

fn compare(a: &Product, b: &Product, sort: SortSpec) -> Ordering {
    let ordering = match sort.field {
        Field::Code => a.code.cmp(&b.code),
        Field::Name => a.name.cmp(&b.name),
        Field::Features => a.features.cmp(&b.features),
        Field::Capacity => a.capacity.total_cmp(&b.capacity),
        Field::EnergyClass => a.energy_class.cmp(&b.energy_class),
        Field::PriceValue => a.price.value.cmp(&b.price.value),
    };

    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use catalog_core::{Installment, ListingParams, Price};
    use chrono::{TimeZone, Utc};

    use super::*;

    /// A product with the given varying attributes and fixed everything else.
    pub(crate) fn product(
        code: &str,
        name: &str,
        capacity: f64,
        energy_class: &str,
        features: &[&str],
        price_cents: i64,
    ) -> Product {
        Product {
            image: format!("https://example.com/{code}.jpg"),
            code: code.to_string(),
            name: name.to_string(),
            color: "biała".to_string(),
            capacity,
            dimensions: "55 x 60 x 85 cm".to_string(),
            features: features.iter().map(ToString::to_string).collect(),
            energy_class: energy_class.to_string(),
            price: Price {
                value: Decimal::new(price_cents, 2),
                currency: "zł".to_string(),
                installment: Installment {
                    value: Decimal::new(5331, 2),
                    period: 60,
                },
                valid_from: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
                valid_to: Utc.with_ymd_and_hms(2021, 12, 31, 0, 0, 0).unwrap(),
            },
        }
    }

    pub(crate) fn catalog() -> Vec<Product> {
        let quick_drive = "Pralka QuickDrive";
        vec![
            product(
                "WW90T754ABT",
                quick_drive,
                9.0,
                "A",
                &["Drzwi AddWash", "Panel AI Control"],
                299_910,
            ),
            product("WW90T754ABH", quick_drive, 10.5, "A", &["Panel AI Control"], 199_920),
            product(
                "WW80T-WASHER",
                "Washer EcoBubble",
                8.0,
                "B",
                &["Silnik inwerterowy"],
                179_900,
            ),
            product("WW90T754ABD", quick_drive, 8.0, "B", &["Drzwi AddWash"], 199_900),
            product("WW90T754ABE", quick_drive, 10.5, "C", &["Panel AI Control"], 199_900),
        ]
    }

    async fn codes(store: &MemoryProductStore, params: ListingParams) -> Vec<String> {
        store
            .find(&params.build_query())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.code)
            .collect()
    }

    #[tokio::test]
    async fn test_find_without_filter_returns_insertion_order() {
        let store = MemoryProductStore::with_products(catalog());
        assert_eq!(
            codes(&store, ListingParams::default()).await,
            ["WW90T754ABT", "WW90T754ABH", "WW80T-WASHER", "WW90T754ABD", "WW90T754ABE"]
        );
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_fields() {
        let store = MemoryProductStore::with_products(catalog());

        // name
        assert_eq!(
            codes(&store, ListingParams::default().with_search("ecobubble")).await,
            ["WW80T-WASHER"]
        );
        // features
        assert_eq!(
            codes(&store, ListingParams::default().with_search("inwerter")).await,
            ["WW80T-WASHER"]
        );
        // code
        assert_eq!(
            codes(&store, ListingParams::default().with_search("abh")).await,
            ["WW90T754ABH"]
        );
    }

    #[tokio::test]
    async fn test_combined_filter_narrows_to_single_match() {
        let store = MemoryProductStore::with_products(catalog());
        let params = ListingParams::default()
            .with_search("washer")
            .with_capacity("8")
            .with_energy_class("B");
        assert_eq!(codes(&store, params).await, ["WW80T-WASHER"]);
    }

    #[tokio::test]
    async fn test_feature_membership_is_exact() {
        let store = MemoryProductStore::with_products(catalog());
        assert_eq!(
            codes(&store, ListingParams::default().with_feature("Drzwi AddWash")).await,
            ["WW90T754ABT", "WW90T754ABD"]
        );
        assert!(
            codes(&store, ListingParams::default().with_feature("drzwi addwash"))
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_nan_capacity_matches_nothing() {
        let store = MemoryProductStore::with_products(catalog());
        assert!(
            codes(&store, ListingParams::default().with_capacity("abc"))
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_sort_by_price_keeps_ties_in_insertion_order() {
        let store = MemoryProductStore::with_products(catalog());
        assert_eq!(
            codes(&store, ListingParams::default().with_sort("price")).await,
            ["WW80T-WASHER", "WW90T754ABD", "WW90T754ABE", "WW90T754ABH", "WW90T754ABT"]
        );
    }

    #[tokio::test]
    async fn test_sort_by_capacity() {
        let store = MemoryProductStore::with_products(catalog());
        assert_eq!(
            codes(&store, ListingParams::default().with_sort("capacity")).await,
            ["WW80T-WASHER", "WW90T754ABD", "WW90T754ABT", "WW90T754ABH", "WW90T754ABE"]
        );
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_reported() {
        let store = MemoryProductStore::with_products(catalog());
        let result = store
            .find(&ListingParams::default().with_search("(").build_query())
            .await;
        assert!(matches!(result, Err(RepositoryError::InvalidPattern(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_codes() {
        let store = MemoryProductStore::with_products(catalog());
        let duplicate = catalog().remove(0);

        let result = store.insert_many(&[duplicate]).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        let fresh = product("NEW-1", "Nowa", 7.0, "A", &[], 100_000);
        let result = store.insert_many(&[fresh.clone(), fresh]).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(codes(&store, ListingParams::default()).await.len(), 5);
    }

    #[tokio::test]
    async fn test_delete_then_insert_reseeds() {
        let store = MemoryProductStore::with_products(catalog());

        assert_eq!(store.delete_many().await.unwrap(), 5);
        assert!(codes(&store, ListingParams::default()).await.is_empty());

        assert_eq!(store.insert_many(&catalog()).await.unwrap(), 5);
        assert_eq!(codes(&store, ListingParams::default()).await.len(), 5);
    }
}
