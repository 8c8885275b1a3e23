//! Appliance Catalog Core - Shared types library.
//!
//! This crate provides common types used across all catalog components:
//! - `server` - JSON listing API backed by the product store
//! - `client` - Fetch adapter and listing view consuming that API
//! - `cli` - Command-line tools for migrations, seeding and listing
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! on both sides of the wire.
//!
//! # Modules
//!
//! - [`types`] - The product record schema
//! - [`query`] - Listing parameters and the filter and sort built from them
//! - [`response`] - JSON envelopes returned by the listing endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod query;
pub mod response;
pub mod types;

pub use query::{
    Clause, Field, Filter, ListingParams, ListingQuery, Scalar, SortDirection, SortSpec,
};
pub use response::{ErrorResponse, ListingResponse};
pub use types::*;
