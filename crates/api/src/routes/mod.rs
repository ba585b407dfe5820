//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /api/Register             - Create an account
//! POST /api/Login                - Login, sets the session cookie
//! POST /api/Logout               - Logout, clears the session cookie
//!
//! # Profile (requires session)
//! GET  /api/Profile              - Authenticated user's record
//! GET  /api/getProfilePic        - Profile picture reference
//! PUT  /api/editProfilePic       - Change profile picture reference
//! PUT  /api/editProfilePassword  - Change password
//! PUT  /api/editProfileUsername  - Change display name
//! PUT  /api/editProfileEmail     - Change email (re-verifies password)
//!
//! # Catalog
//! GET  /api/listing              - Products, optional ?type= filter (requires session)
//! GET  /api/search               - Search products by ?q= (public)
//!
//! # Cart (requires session)
//! GET    /api/cart               - Current cart contents
//! POST   /api/cart               - Add a product (quantities accumulate)
//! DELETE /api/cart               - Empty the cart
//! DELETE /api/cart/{product_id}  - Remove one product
//!
//! # Orders (requires session)
//! POST /api/order                - Place an order from client-sent lines
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Plain `{"message": ...}` body shared by handlers that confirm an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/Register", post(auth::register))
        .route("/Login", post(auth::login))
        .route("/Logout", post(auth::logout))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/Profile", get(profile::show))
        .route("/getProfilePic", get(profile::picture))
        .route("/editProfilePic", put(profile::edit_picture))
        .route("/editProfilePassword", put(profile::edit_password))
        .route("/editProfileUsername", put(profile::edit_username))
        .route("/editProfileEmail", put(profile::edit_email))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/listing", get(products::listing))
        .route("/search", get(products::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/cart/{product_id}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/order", post(orders::place))
}

/// Create all routes for the API.
///
/// Paths keep the exact casing the web client calls them with.
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(auth_routes())
            .merge(profile_routes())
            .merge(catalog_routes())
            .merge(cart_routes())
            .merge(order_routes()),
    )
}
