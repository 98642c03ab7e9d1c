//! Coupon repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use harvest_hub_core::{CouponId, DiscountPercentage};

use super::RepositoryError;
use crate::models::Coupon;
use crate::services::CouponStore;

#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    coupon_id: CouponId,
    code: String,
    discount_percentage: Decimal,
    is_active: bool,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = RepositoryError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let discount = DiscountPercentage::new(row.discount_percentage).map_err(|e| {
            RepositoryError::DataCorruption(format!("coupon {}: {e}", row.coupon_id))
        })?;
        Ok(Self {
            id: row.coupon_id,
            code: row.code,
            discount,
            is_active: row.is_active,
        })
    }
}

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a coupon by its exact code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored discount is out of range.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let row = sqlx::query_as::<_, CouponRow>(
            r"
            SELECT coupon_id, code, discount_percentage, is_active
            FROM storefront.coupons
            WHERE code = $1
            ",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        row.map(Coupon::try_from).transpose()
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        code: &str,
        discount: DiscountPercentage,
        is_active: bool,
    ) -> Result<Coupon, RepositoryError> {
        let row = sqlx::query_as::<_, CouponRow>(
            r"
            INSERT INTO storefront.coupons (code, discount_percentage, is_active)
            VALUES ($1, $2, $3)
            RETURNING coupon_id, code, discount_percentage, is_active
            ",
        )
        .bind(code)
        .bind(discount.value())
        .bind(is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "coupon code"))?;

        Coupon::try_from(row)
    }

    /// List every coupon, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Coupon>, RepositoryError> {
        let rows = sqlx::query_as::<_, CouponRow>(
            r"
            SELECT coupon_id, code, discount_percentage, is_active
            FROM storefront.coupons
            ORDER BY code
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Coupon::try_from).collect()
    }
}

impl CouponStore for CouponRepository<'_> {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        self.get_by_code(code).await
    }
}
