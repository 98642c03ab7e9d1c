//! Business logic services for storefront.
//!
//! # Services
//!
//! - `coupons` - Coupon validation
//! - `checkout` - Order writer (customer, order and item rows)
//! - `auth` - Password registration and login

pub mod auth;
pub mod checkout;
pub mod coupons;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutRequest, CheckoutStore, OrderService};
pub use coupons::{CouponService, CouponStore, CouponValidation};
