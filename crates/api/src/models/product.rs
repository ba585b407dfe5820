//! Product catalog types.

use serde::Serialize;

use vestra_core::{Money, ProductId};

/// A catalog product.
///
/// Size and color are free-form text (e.g., "42", "M", "navy") so substring
/// search can match across them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Category used by the listing filter.
    pub category: String,
    /// Size label.
    pub size: String,
    /// Color label.
    pub color: String,
    /// Unit price.
    pub price: Money,
    /// Image path served under `/uploads`, if any.
    pub image_url: Option<String>,
}
