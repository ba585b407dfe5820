//! Profile route handlers.
//!
//! Everything here requires a session. The account being read or changed
//! is always the one in the verified token; request bodies never pick the
//! target user.

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::db::users::UserRepository;
use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::routes::MessageResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Profile picture reference, as stored.
#[derive(Debug, Serialize)]
pub struct ProfilePictureResponse {
    /// Filename under the upload directory.
    pub profile_picture: String,
}

/// Body for changing the profile picture reference.
#[derive(Debug, Deserialize)]
pub struct EditPictureRequest {
    /// New filename; empty or missing keeps the current picture.
    #[serde(default)]
    pub profile_picture: String,
}

/// Body for changing the password.
#[derive(Debug, Deserialize)]
pub struct EditPasswordRequest {
    /// New plaintext password, hashed before storage.
    #[serde(default)]
    pub password: String,
}

/// Body for changing the display name.
#[derive(Debug, Deserialize)]
pub struct EditUsernameRequest {
    /// New display name.
    #[serde(default)]
    pub username: String,
}

/// Body for changing the email address.
#[derive(Debug, Deserialize)]
pub struct EditEmailRequest {
    /// New email address.
    #[serde(default)]
    pub new_email: String,
    /// Current password, re-verified before the change.
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the authenticated user's record.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let users = UserRepository::new(state.pool());
    let record = users
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_owned()))?;

    Ok(Json(record))
}

/// Return just the profile picture reference.
pub async fn picture(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ProfilePictureResponse>, ApiError> {
    let users = UserRepository::new(state.pool());
    let profile_picture = users
        .get_profile_picture(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_owned()))?;

    Ok(Json(ProfilePictureResponse { profile_picture }))
}

/// Change the profile picture reference.
///
/// An empty value keeps the current picture, so the client can always
/// send the field.
pub async fn edit_picture(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<EditPictureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserRepository::new(state.pool());
    users
        .update_profile_picture(user.id, &body.profile_picture)
        .await?;

    tracing::info!(user_id = %user.id, "profile picture updated");

    Ok(Json(MessageResponse {
        message: "profile picture updated",
    }))
}

/// Change the password.
pub async fn edit_password(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<EditPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool());
    service.change_password(user.id, &body.password).await?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(Json(MessageResponse {
        message: "password updated",
    }))
}

/// Change the display name.
pub async fn edit_username(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<EditUsernameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool());
    service.change_username(user.id, &body.username).await?;

    tracing::info!(user_id = %user.id, "username changed");

    Ok(Json(MessageResponse {
        message: "username updated",
    }))
}

/// Change the email address after re-verifying the password.
pub async fn edit_email(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<EditEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool());
    service
        .change_email(user.id, &body.new_email, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "email changed");

    Ok(Json(MessageResponse {
        message: "email updated",
    }))
}
