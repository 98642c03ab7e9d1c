//! Core types for HarvestHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod discount;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use discount::{DiscountError, DiscountPercentage};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::format_money;
pub use status::*;
