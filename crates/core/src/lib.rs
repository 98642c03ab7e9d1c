//! HarvestHub Core - Shared domain types.
//!
//! This crate provides the types used across all HarvestHub components:
//! - `storefront` - Public-facing shop, checkout and admin dashboard
//! - `cli` - Command-line tools for migrations, seeding and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Checkout arithmetic lives here so that it can be tested
//! without a running store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, discounts and statuses
//! - [`cart`] - Parsing of client-submitted cart payloads
//! - [`totals`] - Subtotal, flat-rate tax and total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod totals;
pub mod types;

pub use cart::{CartError, CartLine, CartPayload};
pub use totals::{OrderTotals, TAX_RATE};
pub use types::*;
