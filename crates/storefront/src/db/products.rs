//! Product catalog repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use harvest_hub_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: ProductId,
    name: String,
    price: Decimal,
    image_url: String,
    category: String,
    description: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.product_id,
            name: row.name,
            price: row.price,
            image_url: row.image_url,
            category: row.category,
            description: row.description,
        }
    }
}

/// A catalog entry to insert or update.
#[derive(Debug, Clone, Copy)]
pub struct ProductSeed<'s> {
    pub name: &'s str,
    pub price: Decimal,
    pub image_url: &'s str,
    pub category: &'s str,
    pub description: &'s str,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT product_id, name, price, image_url, category, description
            FROM storefront.products
            ORDER BY product_id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List the first `limit` products for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT product_id, name, price, image_url, category, description
            FROM storefront.products
            ORDER BY product_id
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT product_id, name, price, image_url, category, description
            FROM storefront.products
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a product, or update it if one with the same name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, seed: &ProductSeed<'_>) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO storefront.products (name, price, image_url, category, description)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE
            SET price = EXCLUDED.price,
                image_url = EXCLUDED.image_url,
                category = EXCLUDED.category,
                description = EXCLUDED.description
            RETURNING product_id, name, price, image_url, category, description
            ",
        )
        .bind(seed.name)
        .bind(seed.price)
        .bind(seed.image_url)
        .bind(seed.category)
        .bind(seed.description)
        .fetch_one(self.pool)
        .await?;

        Ok(Product::from(row))
    }
}
