//! Product repository for catalog reads.
//!
//! Both queries are pure reads with no transactional requirements. Search uses
//! `ILIKE` so matching is case-insensitive, the same behavior clients get from
//! case-insensitive collations elsewhere.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::product::Product;

/// Repository for product catalog queries.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by exact category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let products: Vec<Product> = sqlx::query_as(
            r"
            SELECT id, name, brand, category, size, color, price, image_url
            FROM products
            WHERE $1::text IS NULL OR category = $1
            ORDER BY id
            ",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Search products by substring across category, brand, size, and color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{term}%");

        let products: Vec<Product> = sqlx::query_as(
            r"
            SELECT id, name, brand, category, size, color, price, image_url
            FROM products
            WHERE category ILIKE $1
               OR brand ILIKE $1
               OR size ILIKE $1
               OR color ILIKE $1
            ORDER BY id
            ",
        )
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}
