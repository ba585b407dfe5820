//! Integration tests for Vestra.
//!
//! The tests in `tests/` drive a running API over HTTP, so they are all
//! `#[ignore]`d by default and skipped in a plain `cargo test`.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, then prepare the database
//! cargo run -p vestra-cli -- migrate
//! cargo run -p vestra-cli -- seed
//!
//! # Start the API server
//! cargo run -p vestra-api
//!
//! # Run the suite against it
//! cargo test -p vestra-integration-tests -- --ignored
//! ```
//!
//! The target server defaults to `http://localhost:3000`; point
//! `VESTRA_BASE_URL` elsewhere to test a deployed instance.
//!
//! # Test Categories
//!
//! - `storefront_auth` - Registration, login, sessions
//! - `storefront_catalog` - Listing, search, health
//! - `storefront_cart_orders` - Cart contents and order placement
