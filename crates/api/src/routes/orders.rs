//! Order route handlers.
//!
//! Order placement trusts the client-sent lines and total the way the
//! web client builds them from its cart view; the database snapshot of
//! price-per-line is what the order history shows later.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use vestra_core::{Money, OrderId};

use crate::db::orders::OrderRepository;
use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::NewOrderItem;
use crate::state::AppState;

/// Body for placing an order.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Lines to order; must not be empty.
    #[serde(default)]
    pub products: Vec<NewOrderItem>,
    /// Total as computed by the client.
    pub total_price: Option<Money>,
    /// Delivery address.
    pub address: Option<String>,
}

/// Response to a successful order.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// ID of the new order. The field name matches what the client reads.
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

/// Place an order: one header row plus one row per line, atomically.
pub async fn place(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.products.is_empty() {
        return Err(ApiError::BadRequest(
            "order must contain at least one item".to_owned(),
        ));
    }

    let total_price = body
        .total_price
        .ok_or_else(|| ApiError::BadRequest("total_price is required".to_owned()))?;

    let address = body
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::BadRequest("address is required".to_owned()))?;

    let orders = OrderRepository::new(state.pool());
    let order_id = orders
        .place(user.id, &body.products, total_price, address)
        .await?;

    tracing::info!(
        user_id = %user.id,
        order_id = %order_id,
        lines = body.products.len(),
        "order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "order placed",
            order_id,
        }),
    ))
}
