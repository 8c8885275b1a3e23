//! The product record schema.
//!
//! A [`Product`] is the sole stored entity. `code` is the natural key and is
//! unique across the store; every field is required.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A catalog product as stored and as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Image URL.
    pub image: String,
    /// Globally unique product code.
    pub code: String,
    /// Display name.
    pub name: String,
    pub color: String,
    /// Drum capacity, may be fractional (e.g. 10.5).
    pub capacity: f64,
    /// Free-text dimensions (e.g. "55 x 60 x 85 cm").
    pub dimensions: String,
    /// Feature labels in display order.
    pub features: Vec<String>,
    /// Energy class code (e.g. "A").
    pub energy_class: String,
    pub price: Price,
}

/// Price of a product, with its installment plan and validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Currency symbol (e.g. "zł").
    pub currency: String,
    pub installment: Installment,
    #[serde(with = "timestamp")]
    pub valid_from: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub valid_to: DateTime<Utc>,
}

/// Monthly installment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Number of monthly payments.
    pub period: u32,
}

impl Price {
    /// Whether the validity window is well ordered (`valid_from <= valid_to`).
    ///
    /// Nothing on the read path enforces this; write paths should check it.
    #[must_use]
    pub fn has_ordered_validity(&self) -> bool {
        self.valid_from <= self.valid_to
    }

    /// Whether the price applies at the given instant (inclusive bounds).
    #[must_use]
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && at <= self.valid_to
    }
}
