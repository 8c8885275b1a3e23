//! Listing parameters and the filter and sort built from them.
//!
//! The listing endpoint accepts five optional, untyped query parameters. They
//! are translated here into a storage-independent [`ListingQuery`]: a
//! [`Filter`] that is a conjunction of [`Clause`]s plus an optional
//! [`SortSpec`]. Stores compile that value into their own query language.
//!
//! | Parameter     | Constraint                                                      |
//! |---------------|-----------------------------------------------------------------|
//! | `search`      | any of `code`, `name`, `features` matches, case-insensitive     |
//! | `capacity`    | `capacity` equals the value parsed as a float                   |
//! | `energyClass` | `energyClass` equals the value                                  |
//! | `feature`     | `features` contains the value                                   |
//! | `sort`        | `price` → ascending `price.value`, `capacity` → ascending `capacity` |
//!
//! Absent and empty parameters add no constraint.

use serde::{Deserialize, Serialize};

/// Fields searched by the free-text `search` parameter.
const SEARCH_FIELDS: [Field; 3] = [Field::Code, Field::Name, Field::Features];

/// Raw listing parameters as they arrive in (or are sent as) a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// A product field that filters and sorts can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Code,
    Name,
    Features,
    Capacity,
    EnergyClass,
    PriceValue,
}

/// A literal compared against a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

/// A single predicate over a product.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field equals the value exactly.
    Equals { field: Field, value: Scalar },
    /// Field matches the pattern, case-insensitive. On a sequence field any
    /// element may match.
    Matches { field: Field, pattern: String },
    /// Sequence field contains the value as one of its elements.
    Contains { field: Field, value: String },
    /// At least one of the nested clauses holds.
    AnyOf(Vec<Clause>),
}

/// Conjunction of clauses. An empty filter matches every product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Requested ordering of the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

/// Everything a store needs to answer a listing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub filter: Filter,
    /// `None` leaves ordering to the store.
    pub sort: Option<SortSpec>,
}

impl Field {
    /// Dotted document path of the field, as it appears on the wire.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Name => "name",
            Self::Features => "features",
            Self::Capacity => "capacity",
            Self::EnergyClass => "energyClass",
            Self::PriceValue => "price.value",
        }
    }
}

impl Filter {
    /// Add a clause to the conjunction.
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl SortSpec {
    #[must_use]
    pub const fn ascending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Interpret the `sort` query parameter. Unknown keys request no sort.
    #[must_use]
    pub fn from_param(key: &str) -> Option<Self> {
        match key {
            "price" => Some(Self::ascending(Field::PriceValue)),
            "capacity" => Some(Self::ascending(Field::Capacity)),
            _ => None,
        }
    }
}

impl ListingParams {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: impl Into<String>) -> Self {
        self.capacity = Some(capacity.into());
        self
    }

    #[must_use]
    pub fn with_energy_class(mut self, energy_class: impl Into<String>) -> Self {
        self.energy_class = Some(energy_class.into());
        self
    }

    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Parameters as `(name, value)` pairs, absent ones omitted.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", self.search.as_deref()),
            ("capacity", self.capacity.as_deref()),
            ("energyClass", self.energy_class.as_deref()),
            ("feature", self.feature.as_deref()),
            ("sort", self.sort.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// Build the filter and sort for these parameters.
    ///
    /// Pure: no validation beyond numeric parsing. A `capacity` that does not
    /// parse becomes `NaN` and therefore matches nothing.
    #[must_use]
    pub fn build_query(&self) -> ListingQuery {
        let mut filter = Filter::default();

        if let Some(search) = present(self.search.as_deref()) {
            filter.push(Clause::AnyOf(
                SEARCH_FIELDS
                    .iter()
                    .map(|&field| Clause::Matches {
                        field,
                        pattern: search.to_owned(),
                    })
                    .collect(),
            ));
        }

        if let Some(capacity) = present(self.capacity.as_deref()) {
            filter.push(Clause::Equals {
                field: Field::Capacity,
                value: Scalar::Number(parse_number(capacity)),
            });
        }

        if let Some(energy_class) = present(self.energy_class.as_deref()) {
            filter.push(Clause::Equals {
                field: Field::EnergyClass,
                value: Scalar::Text(energy_class.to_owned()),
            });
        }

        if let Some(feature) = present(self.feature.as_deref()) {
            filter.push(Clause::Contains {
                field: Field::Features,
                value: feature.to_owned(),
            });
        }

        let sort = present(self.sort.as_deref()).and_then(SortSpec::from_param);

        ListingQuery { filter, sort }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Lenient numeric parsing in the manner of a browser's `Number()`.
///
/// Surrounding whitespace is ignored and blank input is zero. Unsigned
/// `0x`/`0o`/`0b` literals are integers in that radix. Only the spelled-out
/// `Infinity` is infinite; Rust's own `inf` and `nan` spellings are rejected.
/// Anything else unparsable yields `NaN`. Radix literals wider than 64 bits
/// are `NaN` rather than rounded.
fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        #[allow(clippy::cast_precision_loss)] // same rounding as a JS number
        let value = trimmed
            .get(2..)
            .filter(|digits| digits.chars().all(|c| c.is_digit(radix)))
            .and_then(|digits| u64::from_str_radix(digits, radix).ok())
            .map_or(f64::NAN, |n| n as f64);
        return value;
    }

    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}
