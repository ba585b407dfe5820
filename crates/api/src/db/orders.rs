//! Order repository.
//!
//! Order placement is the one multi-statement write in the system: the header
//! and every line item commit together or not at all. A partial order (header
//! without items, or items without a header) must never be observable.

use sqlx::PgPool;

use vestra_core::{Money, OrderId, UserId};

use super::RepositoryError;
use crate::models::order::NewOrderItem;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order header and all of its line items in one transaction.
    ///
    /// The caller is responsible for rejecting empty item lists before this
    /// point; an empty slice here would commit a header with no lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back and nothing is persisted.
    pub async fn place(
        &self,
        user_id: UserId,
        items: &[NewOrderItem],
        total_price: Money,
        address: &str,
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO orders (user_id, total_price, address)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(user_id.as_i32())
        .bind(total_price)
        .bind(address)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(item.product_id.as_i32())
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }
}
