//! Order types.

use serde::Deserialize;

use vestra_core::{Money, ProductId};

/// A line item submitted at checkout.
///
/// The price is a client-side snapshot of the unit price at purchase time and
/// is persisted verbatim on the order line.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: i32,
    /// Unit price at purchase time.
    pub price: Money,
}
