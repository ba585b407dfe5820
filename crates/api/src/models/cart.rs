//! Cart types.

use serde::Serialize;

use vestra_core::{Money, ProductId};

/// One line of a user's cart, joined with the product it references.
///
/// `line_total` is computed in SQL as `price * quantity` so the JSON the
/// client sees is always consistent with the stored quantity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    /// Product in the cart.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Unit price.
    pub price: Money,
    /// Product image path, if any.
    pub image_url: Option<String>,
    /// Accumulated quantity. Always positive.
    pub quantity: i32,
    /// Unit price times quantity.
    pub line_total: Money,
}
