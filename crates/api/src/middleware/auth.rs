//! Authentication middleware and extractors.
//!
//! Sessions ride in an `auth_token` cookie holding a signed JWT. The
//! [`RequireAuth`] extractor pulls the token out of the `Cookie` header
//! and verifies it against the configured secret; handlers never see raw
//! tokens, only the authenticated [`CurrentUser`].

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use vestra_core::UserId;

use crate::services::token;
use crate::state::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth_token";

/// The authenticated user attached to a request.
///
/// Carries only the ID from the verified token claims; handlers that
/// need the full account load it from the database themselves.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// Database ID of the user.
    pub id: UserId,
}

/// Extractor that requires a valid session token.
///
/// If the cookie is missing or its token fails verification, the request
/// is rejected with 403 before the handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when a request lacks a usable session token.
pub enum AuthRejection {
    /// No `auth_token` cookie on the request.
    MissingToken,
    /// The cookie is present but its token fails verification.
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "missing session token",
            Self::InvalidToken => "invalid or expired session token",
        };

        (
            StatusCode::FORBIDDEN,
            Json(json!({ "kind": "auth", "message": message })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(token_from_cookie_header)
            .ok_or(AuthRejection::MissingToken)?;

        let state = AppState::from_ref(state);
        let user_id = token::verify(token, &state.config().token_secret)
            .map_err(|_| AuthRejection::InvalidToken)?;

        Ok(Self(CurrentUser { id: user_id }))
    }
}

/// Build the `Set-Cookie` value that installs a session token.
///
/// `HttpOnly` keeps scripts away from the token; `SameSite=None; Secure`
/// lets browsers send it on cross-origin fetch calls from the SPA.
#[must_use]
pub fn session_cookie(token: &str, max_age: chrono::Duration) -> String {
    format!(
        "{AUTH_COOKIE}={token}; HttpOnly; Secure; SameSite=None; Path=/; Max-Age={}",
        max_age.num_seconds()
    )
}

/// Build the `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn expired_session_cookie() -> String {
    format!("{AUTH_COOKIE}=; HttpOnly; Secure; SameSite=None; Path=/; Max-Age=0")
}

/// Pull the session token out of a `Cookie` header value.
fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .find_map(|pair| pair.trim().strip_prefix(AUTH_COOKIE)?.strip_prefix('='))
        .filter(|token| !token.is_empty())
}
