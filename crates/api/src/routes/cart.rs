//! Cart route handlers.
//!
//! The cart holds one row per (user, product); adding the same product
//! again bumps the quantity in that row. Removal endpoints are
//! idempotent, so double-clicks in the client are harmless.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use vestra_core::ProductId;

use crate::db::cart::CartRepository;
use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::routes::MessageResponse;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body for adding a product to the cart.
///
/// Both fields are optional so bad requests get a contract 400 instead
/// of a serde rejection.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Product to add.
    pub product_id: Option<ProductId>,
    /// How many to add; accumulates with what is already in the cart.
    pub quantity: Option<i32>,
}

/// Response to a successful add: confirmation plus the refreshed cart,
/// so the client can redraw without a second request.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// The full cart after the change.
    pub cart: Vec<CartLine>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the cart contents with product details and line totals.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartLine>>, ApiError> {
    let cart = CartRepository::new(state.pool());
    let lines = cart.list(user.id).await?;

    Ok(Json(lines))
}

/// Add a product to the cart, accumulating quantity on repeats.
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product_id = body
        .product_id
        .ok_or_else(|| ApiError::BadRequest("product_id is required".to_owned()))?;

    let quantity = body.quantity.unwrap_or(0);
    if quantity <= 0 {
        return Err(ApiError::BadRequest("quantity must be positive".to_owned()));
    }

    let cart = CartRepository::new(state.pool());
    cart.add_item(user.id, product_id, quantity).await?;
    let lines = cart.list(user.id).await?;

    tracing::info!(user_id = %user.id, product_id = %product_id, quantity, "cart item added");

    Ok((
        StatusCode::CREATED,
        Json(CartResponse {
            message: "cart updated",
            cart: lines,
        }),
    ))
}

/// Remove one product from the cart.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = CartRepository::new(state.pool());
    cart.remove_item(user.id, product_id).await?;

    Ok(Json(MessageResponse {
        message: "item removed",
    }))
}

/// Empty the cart.
pub async fn clear(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = CartRepository::new(state.pool());
    cart.clear(user.id).await?;

    Ok(Json(MessageResponse {
        message: "cart emptied",
    }))
}
