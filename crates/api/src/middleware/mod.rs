//! HTTP middleware and request extractors.
//!
//! The only custom piece is cookie-based session auth; the rest of the
//! stack (request tracing, CORS, static uploads, Sentry) comes from
//! tower-http and sentry-tower layers wired up in `main`.

pub mod auth;

pub use auth::{CurrentUser, RequireAuth, expired_session_cookie, session_cookie};
