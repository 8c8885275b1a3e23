//! Appliance Catalog Client - fetch adapter and listing view.
//!
//! - [`api`] - [`CatalogClient`], which calls `GET /api/products` and
//!   normalizes the wire dates of every returned product
//! - [`view`] - [`ProductListing`], the loading/error/empty/populated view
//!   driven by the current filter criteria

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod view;

pub use api::{CatalogClient, ClientError, RawProduct};
pub use view::{FetchTicket, ListingState, ProductListing, ProductSource};
