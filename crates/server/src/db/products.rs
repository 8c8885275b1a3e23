//! `PostgreSQL` product store.
//!
//! Listing queries are compiled from the storage-independent filter into SQL
//! with `sqlx::QueryBuilder`; every user-supplied value is a bound parameter.
//! Pattern clauses use the case-insensitive POSIX regex operator `~*`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use catalog_core::{
    Clause, Field, Filter, Installment, ListingQuery, Price, Product, Scalar, SortDirection,
    SortSpec,
};

use super::{ProductStore, RepositoryError};

const SELECT_PRODUCTS: &str = r"
    SELECT code, image, name, color, capacity, dimensions, features, energy_class,
           price_value, price_currency, installment_value, installment_period,
           valid_from, valid_to
    FROM catalog.product";

const INSERT_PRODUCTS: &str = r"
    INSERT INTO catalog.product (
        code, image, name, color, capacity, dimensions, features, energy_class,
        price_value, price_currency, installment_value, installment_period,
        valid_from, valid_to
    ) ";

/// Row shape of `catalog.product`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    code: String,
    image: String,
    name: String,
    color: String,
    capacity: f64,
    dimensions: String,
    features: Vec<String>,
    energy_class: String,
    price_value: Decimal,
    price_currency: String,
    installment_value: Decimal,
    installment_period: i32,
    valid_from: DateTime<Utc>,
    valid_to: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let period = u32::try_from(row.installment_period).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative installment period for product {}",
                row.code
            ))
        })?;

        Ok(Self {
            image: row.image,
            code: row.code,
            name: row.name,
            color: row.color,
            capacity: row.capacity,
            dimensions: row.dimensions,
            features: row.features,
            energy_class: row.energy_class,
            price: Price {
                value: row.price_value,
                currency: row.price_currency,
                installment: Installment {
                    value: row.installment_value,
                    period,
                },
                valid_from: row.valid_from,
                valid_to: row.valid_to,
            },
        })
    }
}

/// Product store backed by the `catalog.product` table.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find(&self, query: &ListingQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = select_query(query);
        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn insert_many(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        if products.is_empty() {
            return Ok(0);
        }

        let rows = products
            .iter()
            .map(|p| {
                i32::try_from(p.price.installment.period)
                    .map(|period| (p, period))
                    .map_err(|_| {
                        RepositoryError::DataCorruption(format!(
                            "installment period out of range for product {}",
                            p.code
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(INSERT_PRODUCTS);
        builder.push_values(rows, |mut b, (p, period)| {
            b.push_bind(p.code.as_str())
                .push_bind(p.image.as_str())
                .push_bind(p.name.as_str())
                .push_bind(p.color.as_str())
                .push_bind(p.capacity)
                .push_bind(p.dimensions.as_str())
                .push_bind(p.features.as_slice())
                .push_bind(p.energy_class.as_str())
                .push_bind(p.price.value)
                .push_bind(p.price.currency.as_str())
                .push_bind(p.price.installment.value)
                .push_bind(period)
                .push_bind(p.price.valid_from)
                .push_bind(p.price.valid_to);
        });

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn delete_many(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.product")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Build the `SELECT` for a listing query.
fn select_query(query: &ListingQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_PRODUCTS);
    push_filter(&mut builder, &query.filter);
    push_order(&mut builder, query.sort);
    builder
}

fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    if filter.is_empty() {
        return;
    }

    builder.push(" WHERE ");
    for (i, clause) in filter.clauses().iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        push_clause(builder, clause);
    }
}

fn push_clause(builder: &mut QueryBuilder<'static, Postgres>, clause: &Clause) {
    match clause {
        Clause::Equals {
            field,
            value: Scalar::Text(text),
        }
        | Clause::Contains { field, value: text } => push_text_equals(builder, *field, text),
        Clause::Equals {
            field,
            value: Scalar::Number(number),
        } => match field {
            Field::Capacity | Field::PriceValue => {
                builder
                    .push(column(*field))
                    .push("::float8 = ")
                    .push_bind(*number);
            }
            _ => {
                builder.push("FALSE");
            }
        },
        Clause::Matches { field, pattern } => {
            if *field == Field::Features {
                builder
                    .push("EXISTS (SELECT 1 FROM unnest(features) AS feature WHERE feature ~* ")
                    .push_bind(pattern.clone())
                    .push(")");
            } else {
                builder
                    .push(column(*field))
                    .push("::text ~* ")
                    .push_bind(pattern.clone());
            }
        }
        Clause::AnyOf(clauses) => {
            if clauses.is_empty() {
                builder.push("FALSE");
                return;
            }
            builder.push("(");
            for (i, nested) in clauses.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_clause(builder, nested);
            }
            builder.push(")");
        }
    }
}

/// Equality against a text value; on the feature list this is membership.
fn push_text_equals(builder: &mut QueryBuilder<'static, Postgres>, field: Field, text: &str) {
    match field {
        Field::Features => {
            builder
                .push_bind(text.to_owned())
                .push(" = ANY(features)");
        }
        Field::Code | Field::Name | Field::EnergyClass => {
            builder
                .push(column(field))
                .push(" = ")
                .push_bind(text.to_owned());
        }
        Field::Capacity | Field::PriceValue => {
            builder
                .push(column(field))
                .push("::text = ")
                .push_bind(text.to_owned());
        }
    }
}

fn push_order(builder: &mut QueryBuilder<'static, Postgres>, sort: Option<SortSpec>) {
    builder.push(" ORDER BY ");
    if let Some(sort) = sort {
        let direction = match sort.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        builder
            .push(column(sort.field))
            .push(" ")
            .push(direction)
            .push(", ");
    }
    builder.push("id ASC");
}

const fn column(field: Field) -> &'static str {
    match field {
        Field::Code => "code",
        Field::Name => "name",
        Field::Features => "features",
        Field::Capacity => "capacity",
        Field::EnergyClass => "energy_class",
        Field::PriceValue => "price_value",
    }
}
