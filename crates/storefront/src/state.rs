//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{CouponRepository, OrderRepository};
use crate::services::{CouponService, OrderService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Coupon validator backed by the database.
    #[must_use]
    pub fn coupons(&self) -> CouponService<CouponRepository<'_>> {
        CouponService::new(
            CouponRepository::new(self.pool()),
            self.config().checkout.inactive_coupons,
        )
    }

    /// Order writer backed by the database.
    #[must_use]
    pub fn orders(&self) -> OrderService<OrderRepository<'_>> {
        OrderService::new(OrderRepository::new(self.pool()), self.config().checkout)
    }
}
