//! Integration test helpers for HarvestHub.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`hh-cli migrate`)
//! - The default catalog (`hh-cli seed catalog`)
//! - The storefront running (`cargo run -p harvest-hub-storefront`)
//!
//! Run with: `cargo test -p harvest-hub-integration-tests -- --ignored`

use reqwest::Client;
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL of the running storefront.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client that keeps session cookies and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the storefront database for direct assertions.
///
/// # Panics
///
/// Panics if no database URL is configured or the connection fails.
pub async fn pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("STOREFRONT_DATABASE_URL or DATABASE_URL must be set");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// An email address no other test run will use.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@harvesthub.test", Uuid::new_v4().simple())
}

/// Insert a coupon directly, returning its code.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn insert_coupon(pool: &PgPool, discount: i64, is_active: bool) -> String {
    let code = format!("IT{}", Uuid::new_v4().simple()).to_uppercase();
    sqlx::query(
        "INSERT INTO storefront.coupons (code, discount_percentage, is_active) VALUES ($1, $2, $3)",
    )
    .bind(&code)
    .bind(rust_decimal::Decimal::from(discount))
    .bind(is_active)
    .execute(pool)
    .await
    .expect("Failed to insert coupon");
    code
}
