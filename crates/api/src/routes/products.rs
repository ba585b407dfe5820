//! Catalog route handlers.
//!
//! The listing endpoint sits behind a session like the rest of the shop;
//! search stays public so the landing page works before login.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::db::products::ProductRepository;
use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::state::AppState;

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    /// Category filter. The client sends it as `?type=`.
    #[serde(rename = "type")]
    pub category: Option<String>,
}

/// Query parameters for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text search term.
    pub q: Option<String>,
}

/// Return all products, optionally filtered by category.
pub async fn listing(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = ProductRepository::new(state.pool());
    let items = products.list(params.category.as_deref()).await?;

    Ok(Json(items))
}

/// Search products by substring across category, brand, size, and color.
///
/// A missing or blank term is a 400; a term that matches nothing is a
/// 404, which the client shows as "no results".
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let term = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("search term is required".to_owned()))?;

    let products = ProductRepository::new(state.pool());
    let items = products.search(term).await?;

    if items.is_empty() {
        return Err(ApiError::NotFound("no products matched".to_owned()));
    }

    Ok(Json(items))
}
