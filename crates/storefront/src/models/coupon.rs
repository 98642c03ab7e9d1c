//! Coupon domain type.

use harvest_hub_core::{CouponId, DiscountPercentage};

/// A discount code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub id: CouponId,
    /// Exact code as stored; lookups are case-sensitive.
    pub code: String,
    pub discount: DiscountPercentage,
    pub is_active: bool,
}
