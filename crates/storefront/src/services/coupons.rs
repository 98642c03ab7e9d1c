//! Coupon validation.
//!
//! Looks a code up in the store and answers `{valid, discount?}`. Unknown
//! codes and store failures both produce `{valid: false}`; neither is an
//! error from the caller's point of view.

use std::future::Future;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::config::InactiveCouponPolicy;
use crate::db::RepositoryError;
use crate::models::Coupon;

/// Read access to coupons.
pub trait CouponStore: Send + Sync {
    /// Find the coupon whose code matches `code` exactly.
    fn find_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<Coupon>, RepositoryError>> + Send;
}

/// Response body of `POST /validate-coupon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CouponValidation {
    pub valid: bool,
    /// Discount percentage; omitted entirely when the coupon is not valid.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount: Option<Decimal>,
}

impl CouponValidation {
    /// The negative answer.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            valid: false,
            discount: None,
        }
    }

    /// A valid coupon with its discount.
    #[must_use]
    pub const fn valid(discount: Decimal) -> Self {
        Self {
            valid: true,
            discount: Some(discount),
        }
    }
}

/// Validates coupon codes against a [`CouponStore`].
pub struct CouponService<S> {
    store: S,
    inactive: InactiveCouponPolicy,
}

impl<S: CouponStore> CouponService<S> {
    /// Create a validator with the given inactive-coupon policy.
    #[must_use]
    pub const fn new(store: S, inactive: InactiveCouponPolicy) -> Self {
        Self { store, inactive }
    }

    /// Validate a submitted code.
    ///
    /// Absent or empty codes are answered without touching the store. Matching
    /// is exact: no trimming, no case folding.
    #[instrument(skip(self))]
    pub async fn validate(&self, code: Option<&str>) -> CouponValidation {
        let Some(code) = code.filter(|c| !c.is_empty()) else {
            return CouponValidation::invalid();
        };

        let coupon = match self.store.find_by_code(code).await {
            Ok(Some(coupon)) => coupon,
            Ok(None) => {
                tracing::debug!("Coupon not found");
                return CouponValidation::invalid();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Coupon lookup failed, treating as invalid");
                return CouponValidation::invalid();
            }
        };

        if !coupon.is_active && self.inactive == InactiveCouponPolicy::Reject {
            tracing::debug!(coupon_id = %coupon.id, "Coupon is inactive");
            return CouponValidation::invalid();
        }

        CouponValidation::valid(coupon.discount.value())
    }
}
