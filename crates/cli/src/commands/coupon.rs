//! Coupon management commands.

use harvest_hub_core::DiscountPercentage;
use harvest_hub_storefront::db::CouponRepository;
use rust_decimal::Decimal;
use tracing::info;

use super::connect;

/// Create a coupon.
///
/// # Errors
///
/// Returns an error if the discount is out of range, the code exists, or the
/// database is unreachable.
pub async fn create(
    code: &str,
    discount: Decimal,
    is_active: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Coupon code must not be empty".into());
    }
    let discount = DiscountPercentage::new(discount)?;

    let pool = connect().await?;
    let coupon = CouponRepository::new(&pool)
        .create(code, discount, is_active)
        .await?;

    info!(
        "Coupon created! ID: {}, Code: {}, Discount: {}%, Active: {}",
        coupon.id, coupon.code, coupon.discount, coupon.is_active
    );
    Ok(())
}

/// Print every coupon.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let coupons = CouponRepository::new(&pool).list().await?;

    info!("Coupons ({})", coupons.len());
    for coupon in coupons {
        let state = if coupon.is_active { "active" } else { "inactive" };
        info!("  {:<16} {:>6}%  {}", coupon.code, coupon.discount, state);
    }
    Ok(())
}
