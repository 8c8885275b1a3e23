//! Core types for the appliance catalog.
//!
//! This module provides the stored product record and its nested price objects.

pub mod product;
pub mod timestamp;

pub use product::{Installment, Price, Product};
