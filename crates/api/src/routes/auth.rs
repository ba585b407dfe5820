//! Authentication route handlers.
//!
//! Registration, login, and logout. Login installs the session cookie and
//! logout clears it. Register and login both answer 201 on success, which
//! is what the web client checks for.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::error::{self, ApiError};
use crate::middleware::{RequireAuth, expired_session_cookie, session_cookie};
use crate::models::PublicUser;
use crate::routes::MessageResponse;
use crate::services::auth::AuthService;
use crate::services::token;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
///
/// Fields default to empty strings so a missing field flows into batch
/// validation (one 400 listing every problem) instead of a serde
/// rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address for the new account.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Plaintext password, hashed before storage.
    #[serde(default)]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address of the account.
    #[serde(default)]
    pub email: String,
    /// Plaintext password to verify.
    #[serde(default)]
    pub password: String,
}

/// Login response body. The token also rides in the session cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The signed session token.
    pub token: String,
    /// Public fields of the logged-in user.
    pub user: PublicUser,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle registration.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool());
    let user = service
        .register(&body.email, &body.username, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "registration successful",
        }),
    ))
}

/// Handle login: verify credentials, issue a token, set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool());
    let user = service.login(&body.email, &body.password).await?;

    let config = state.config();
    let token = token::issue(user.id, &config.token_secret, config.token_ttl())?;
    let cookie = session_cookie(&token, config.token_ttl());

    error::set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");

    let user = PublicUser::from(user);
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { token, user }),
    ))
}

/// Handle logout: clear the session cookie.
pub async fn logout(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    error::clear_sentry_user();
    tracing::info!(user_id = %user.id, "user logged out");

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(MessageResponse {
            message: "logged out",
        }),
    )
}
