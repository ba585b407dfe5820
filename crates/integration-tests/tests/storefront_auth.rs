//! Integration tests for registration, login, and sessions.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`vestra migrate`)
//! - The API server running (cargo run -p vestra-api)
//!
//! Run with: cargo test -p vestra-integration-tests -- --ignored

#![allow(clippy::indexing_slicing)]

use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

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

/// Test helper: register an account.
async fn register(client: &Client, email: &str, password: &str) {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/api/Register"))
        .json(&json!({"email": email, "username": "testuser", "password": password}))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::CREATED);
}

/// Test helper: log in and return the `Cookie` header value carrying the
/// session.
///
/// The session cookie is marked `Secure`, which a cookie store refuses to
/// replay over plain http, so tests carry it by hand using the token the
/// login response also returns in its body.
async fn login_session(client: &Client, email: &str, password: &str) -> String {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/api/Login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("token in login response");
    format!("auth_token={token}")
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_register_login_profile_flow() {
    let client = Client::new();
    let email = unique_email("flow");

    register(&client, &email, "hunter62").await;
    let cookie = login_session(&client, &email, "hunter62").await;

    let resp = client
        .get(format!("{}/api/Profile", base_url()))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["username"], "testuser");
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["profile_picture"], "default.png");

    // The password hash must never appear in any response
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_register_collects_all_field_errors() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/Register", base_url()))
        .json(&json!({"email": "not-an-email", "username": "", "password": "abc"}))
        .send()
        .await
        .expect("Failed to send register");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["errors"].as_array().expect("errors array").len(), 3);
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_register_duplicate_email_is_conflict() {
    let client = Client::new();
    let email = unique_email("dup");

    register(&client, &email, "hunter62").await;

    let resp = client
        .post(format!("{}/api/Register", base_url()))
        .json(&json!({"email": email, "username": "other", "password": "hunter62"}))
        .send()
        .await
        .expect("Failed to send register");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_register_normalizes_email_case() {
    let client = Client::new();
    let email = unique_email("case");
    let uppercased = email.to_uppercase();

    register(&client, &uppercased, "hunter62").await;

    // Login with the lowercase spelling reaches the same account
    let cookie = login_session(&client, &email, "hunter62").await;

    let resp = client
        .get(format!("{}/api/Profile", base_url()))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["email"], email.as_str());
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_login_wrong_password_is_unauthorized() {
    let client = Client::new();
    let email = unique_email("wrongpw");

    register(&client, &email, "hunter62").await;

    let resp = client
        .post(format!("{}/api/Login", base_url()))
        .json(&json!({"email": email, "password": "not-the-password"}))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_login_unknown_email_is_not_found() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/Login", base_url()))
        .json(&json!({"email": unique_email("ghost"), "password": "whatever1"}))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_login_sets_session_cookie() {
    let client = Client::new();
    let email = unique_email("cookie");

    register(&client, &email, "hunter62").await;

    let resp = client
        .post(format!("{}/api/Login", base_url()))
        .json(&json!({"email": email, "password": "hunter62"}))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), StatusCode::CREATED);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .expect("header is ASCII")
        .to_string();
    assert!(set_cookie.starts_with("auth_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=None"));

    let body: Value = resp.json().await.expect("Failed to parse login response");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"]["id"].is_number());
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_profile_without_session_is_forbidden() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/Profile", base_url()))
        .send()
        .await
        .expect("Failed to get profile");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["kind"], "auth");
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_tampered_token_is_forbidden() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/Profile", base_url()))
        .header(header::COOKIE, "auth_token=not.a.jwt")
        .send()
        .await
        .expect("Failed to get profile");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_logout_clears_the_cookie() {
    let client = Client::new();
    let email = unique_email("logout");

    register(&client, &email, "hunter62").await;
    let cookie = login_session(&client, &email, "hunter62").await;

    let resp = client
        .post(format!("{}/api/Logout", base_url()))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to logout");

    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .expect("header is ASCII");
    assert!(set_cookie.starts_with("auth_token=;"));
    assert!(set_cookie.contains("Max-Age=0"));

    // Logout without a session is rejected like any protected route
    let resp = client
        .post(format!("{}/api/Logout", base_url()))
        .send()
        .await
        .expect("Failed to send logout");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Profile Update Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_change_password_and_relogin() {
    let client = Client::new();
    let email = unique_email("repass");

    register(&client, &email, "hunter62").await;
    let cookie = login_session(&client, &email, "hunter62").await;

    let resp = client
        .put(format!("{}/api/editProfilePassword", base_url()))
        .header(header::COOKIE, &cookie)
        .json(&json!({"password": "different9"}))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(resp.status(), StatusCode::OK);

    // Old password no longer works, new one does
    let resp = client
        .post(format!("{}/api/Login", base_url()))
        .json(&json!({"email": email, "password": "hunter62"}))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    login_session(&client, &email, "different9").await;
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_change_password_too_short_is_rejected() {
    let client = Client::new();
    let email = unique_email("shortpw");

    register(&client, &email, "hunter62").await;
    let cookie = login_session(&client, &email, "hunter62").await;

    let resp = client
        .put(format!("{}/api/editProfilePassword", base_url()))
        .header(header::COOKIE, &cookie)
        .json(&json!({"password": "12345"}))
        .send()
        .await
        .expect("Failed to send password change");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_change_username_length_bounds() {
    let client = Client::new();
    let email = unique_email("rename");

    register(&client, &email, "hunter62").await;
    let cookie = login_session(&client, &email, "hunter62").await;
    let base_url = base_url();

    let resp = client
        .put(format!("{base_url}/api/editProfileUsername"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"username": "ab"}))
        .send()
        .await
        .expect("Failed to send username change");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .put(format!("{base_url}/api/editProfileUsername"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"username": "renamed_user"}))
        .send()
        .await
        .expect("Failed to send username change");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/Profile"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to get profile");
    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["username"], "renamed_user");
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_change_email_requires_current_password() {
    let client = Client::new();
    let email = unique_email("rekey");
    let new_email = unique_email("rekey-new");

    register(&client, &email, "hunter62").await;
    let cookie = login_session(&client, &email, "hunter62").await;
    let base_url = base_url();

    // Wrong password: rejected, address unchanged
    let resp = client
        .put(format!("{base_url}/api/editProfileEmail"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"new_email": new_email, "password": "not-the-password"}))
        .send()
        .await
        .expect("Failed to send email change");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Correct password: accepted, login works with the new address
    let resp = client
        .put(format!("{base_url}/api/editProfileEmail"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"new_email": new_email, "password": "hunter62"}))
        .send()
        .await
        .expect("Failed to send email change");
    assert_eq!(resp.status(), StatusCode::OK);

    login_session(&client, &new_email, "hunter62").await;
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_change_email_to_taken_address_is_conflict() {
    let client = Client::new();
    let first = unique_email("taken-a");
    let second = unique_email("taken-b");

    register(&client, &first, "hunter62").await;
    register(&client, &second, "hunter62").await;
    let cookie = login_session(&client, &second, "hunter62").await;

    let resp = client
        .put(format!("{}/api/editProfileEmail", base_url()))
        .header(header::COOKIE, &cookie)
        .json(&json!({"new_email": first, "password": "hunter62"}))
        .send()
        .await
        .expect("Failed to send email change");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
#[ignore = "Requires a running vestra-api server"]
async fn test_profile_picture_roundtrip() {
    let client = Client::new();
    let email = unique_email("avatar");

    register(&client, &email, "hunter62").await;
    let cookie = login_session(&client, &email, "hunter62").await;
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/getProfilePic"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to get profile picture");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse picture");
    assert_eq!(body["profile_picture"], "default.png");

    let resp = client
        .put(format!("{base_url}/api/editProfilePic"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"profile_picture": "custom.png"}))
        .send()
        .await
        .expect("Failed to change picture");
    assert_eq!(resp.status(), StatusCode::OK);

    // An empty value keeps the current picture
    let resp = client
        .put(format!("{base_url}/api/editProfilePic"))
        .header(header::COOKIE, &cookie)
        .json(&json!({"profile_picture": ""}))
        .send()
        .await
        .expect("Failed to send picture change");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/getProfilePic"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to get profile picture");
    let body: Value = resp.json().await.expect("Failed to parse picture");
    assert_eq!(body["profile_picture"], "custom.png");
}
