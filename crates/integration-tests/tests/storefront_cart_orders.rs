//! Integration tests for the cart and order placement.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`vestra migrate`)
//! - The demo catalog seeded (`vestra seed`)
//! - The API server running (cargo run -p vestra-api)
//!
//! Run with: cargo test -p vestra-integration-tests -- --ignored

#![allow(clippy::indexing_slicing)]

use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

use vestra_core::Money;

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("VESTRA_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Unique email per test run, so reruns don't trip the unique index.
fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{prefix}-{nanos}@example.com")
}

/// Test helper: register a fresh account and return a session `Cookie`
/// header value. The cookie is marked `Secure`, which a cookie store
/// refuses to replay over plain http, so tests carry it by hand.
async fn session_cookie(client: &Client) -> String {
    let base_url = base_url();
    let email = unique_email("cart");

    let resp = client
        .post(format!("{base_url}/api/Register"))
        .json(&json!({"email": email, "username": "testuser", "password": "hunter62"}))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/api/Login"))
        .json(&json!({"email": email, "password": "hunter62"}))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("token in login response");
    format!("auth_token={token}")
}

/// Test helper: pick a product from the seeded catalog.
async fn first_product(client: &Client, cookie: &str) -> Value {
    let resp = client
        .get(format!("{}/api/listing", base_url()))
        .header(header::COOKIE, cookie)
        .send()
        .await
        .expect("Failed to get listing");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    assert!(!products.is_empty(), "catalog is empty; run `vestra seed`");
    products.into_iter().next().expect("non-empty listing")
}

/// Test helper: fetch the current cart lines.
async fn cart_lines(client: &Client, cookie: &str) -> Vec<Value> {
    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .header(header::COOKIE, cookie)
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::OK);

    resp.json().await.expect("Failed to parse cart")
}

/// Test helper: add a product to the cart, asserting success.
async fn add_to_cart(client: &Client, cookie: &str, product_id: &Value, quantity: i64) -> Value {
    let resp = client
        .post(format!("{}/api/cart", base_url()))
        .header(header::COOKIE, cookie)
        .json(&json!({"product_id": product_id, "quantity": quantity}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    resp.json().await.expect("Failed to parse add response")
}

// ============================================================================
// Cart Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running vestra-api server and seeded catalog"]
async fn test_cart_accumulates_quantity_per_product() {
    let client = Client::new();
    let cookie = session_cookie(&client).await;
    let product = first_product(&client, &cookie).await;

    let body = add_to_cart(&client, &cookie, &product["id"], 2).await;
    let cart = body["cart"].as_array().expect("cart in response");
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"], 2);

    // Adding the same product again bumps the one line instead of
    // creating a second
    let body = add_to_cart(&client, &cookie, &product["id"], 3).await;
    let cart = body["cart"].as_array().expect("cart in response");
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"], 5);

    // Line total is unit price times the accumulated quantity
    let price: Money =
        serde_json::from_value(cart[0]["price"].clone()).expect("price is a decimal string");
    let line_total: Money =
        serde_json::from_value(cart[0]["line_total"].clone()).expect("line_total decimal");
    assert_eq!(line_total, price.checked_mul_quantity(5).expect("no overflow"));
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server and seeded catalog"]
async fn test_cart_remove_and_clear_are_idempotent() {
    let client = Client::new();
    let cookie = session_cookie(&client).await;
    let product = first_product(&client, &cookie).await;
    let base_url = base_url();

    add_to_cart(&client, &cookie, &product["id"], 1).await;

    // Remove the line, twice; both succeed
    for _ in 0..2 {
        let resp = client
            .delete(format!("{base_url}/api/cart/{}", product["id"]))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .expect("Failed to remove item");
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert!(cart_lines(&client, &cookie).await.is_empty());

    // Clear an already-empty cart; still fine
    add_to_cart(&client, &cookie, &product["id"], 1).await;
    for _ in 0..2 {
        let resp = client
            .delete(format!("{base_url}/api/cart"))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .expect("Failed to clear cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert!(cart_lines(&client, &cookie).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server and seeded catalog"]
async fn test_cart_rejects_bad_requests() {
    let client = Client::new();
    let cookie = session_cookie(&client).await;
    let product = first_product(&client, &cookie).await;
    let base_url = base_url();

    // Missing product_id
    let resp = client
        .post(format!("{base_url}/api/cart"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"quantity": 1}))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Zero and negative quantities
    for quantity in [0, -3] {
        let resp = client
            .post(format!("{base_url}/api/cart"))
            .header(header::COOKIE, &cookie)
            .json(&json!({"product_id": product["id"], "quantity": quantity}))
            .send()
            .await
            .expect("Failed to send add");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // Unknown product trips the foreign key, reported as a 400
    let resp = client
        .post(format!("{base_url}/api/cart"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"product_id": 99_999_999, "quantity": 1}))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["kind"], "conflict");

    // Nothing landed in the cart
    assert!(cart_lines(&client, &cookie).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_cart_requires_session() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server and seeded catalog"]
async fn test_carts_are_per_user() {
    let client = Client::new();
    let first_cookie = session_cookie(&client).await;
    let second_cookie = session_cookie(&client).await;
    let product = first_product(&client, &first_cookie).await;

    add_to_cart(&client, &first_cookie, &product["id"], 2).await;

    assert_eq!(cart_lines(&client, &first_cookie).await.len(), 1);
    assert!(cart_lines(&client, &second_cookie).await.is_empty());
}

// ============================================================================
// Order Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running vestra-api server and seeded catalog"]
async fn test_order_placement_returns_order_id() {
    let client = Client::new();
    let cookie = session_cookie(&client).await;
    let product = first_product(&client, &cookie).await;
    let base_url = base_url();

    add_to_cart(&client, &cookie, &product["id"], 2).await;

    let price: Money =
        serde_json::from_value(product["price"].clone()).expect("price is a decimal string");
    let total = price.checked_mul_quantity(2).expect("no overflow");

    let resp = client
        .post(format!("{base_url}/api/order"))
        .header(header::COOKIE, &cookie)
        .json(&json!({
            "products": [{"product_id": product["id"], "quantity": 2, "price": price}],
            "total_price": total,
            "address": "1 Fo utca, Budapest"
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse order response");
    assert!(body["orderId"].is_number());

    // The client empties the cart after checkout
    let resp = client
        .delete(format!("{base_url}/api/cart"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(cart_lines(&client, &cookie).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_order_rejects_missing_fields() {
    let client = Client::new();
    let cookie = session_cookie(&client).await;
    let base_url = base_url();

    // Empty product list
    let resp = client
        .post(format!("{base_url}/api/order"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"products": [], "total_price": "10.00", "address": "somewhere"}))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing address
    let resp = client
        .post(format!("{base_url}/api/order"))
        .header(header::COOKIE, &cookie)
        .json(&json!({
            "products": [{"product_id": 1, "quantity": 1, "price": "10.00"}],
            "total_price": "10.00"
        }))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing total
    let resp = client
        .post(format!("{base_url}/api/order"))
        .header(header::COOKIE, &cookie)
        .json(&json!({
            "products": [{"product_id": 1, "quantity": 1, "price": "10.00"}],
            "address": "somewhere"
        }))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
