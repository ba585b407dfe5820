//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, ApiError>`.
//!
//! Every error response is JSON of the shape `{"kind": ..., "message": ...}`,
//! with validation failures additionally carrying an `errors` array of
//! per-field messages. Status codes follow the API contract: validation and
//! conflicts are 400, wrong password is 401, missing/invalid session is 403,
//! missing records are 404, everything server-side is a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::{AuthError, FieldError};
use crate::services::token::TokenError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session token operation failed.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
        }
    }

    fn internal() -> Self {
        Self::new("internal", "internal server error")
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Auth(err) => match err {
                AuthError::Validation(_)
                | AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidUsername(_)
                | AuthError::EmailTaken => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::Repository(err) => repository_status(err),
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Token(err) => match err {
                TokenError::Invalid => StatusCode::FORBIDDEN,
                TokenError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the client-facing body, consuming the error.
    ///
    /// Internal detail (query text, hashes, sqlx messages) never reaches
    /// the client; server-class failures all collapse to the same generic
    /// body.
    fn into_body(self) -> ErrorBody {
        match self {
            Self::Database(err) => repository_body(err),
            Self::Auth(err) => match err {
                AuthError::Validation(errors) => ErrorBody {
                    kind: "validation",
                    message: "request validation failed".to_string(),
                    errors: Some(errors),
                },
                AuthError::InvalidEmail(e) => ErrorBody::new("validation", format!("invalid email: {e}")),
                AuthError::WeakPassword(msg) | AuthError::InvalidUsername(msg) => {
                    ErrorBody::new("validation", msg)
                }
                AuthError::EmailTaken => ErrorBody::new("conflict", "email already in use"),
                AuthError::UserNotFound => ErrorBody::new("not_found", "user not found"),
                AuthError::InvalidCredentials => {
                    ErrorBody::new("invalid_credentials", "invalid credentials")
                }
                AuthError::Repository(err) => repository_body(err),
                AuthError::PasswordHash => ErrorBody::internal(),
            },
            Self::Token(TokenError::Invalid) => {
                ErrorBody::new("auth", "invalid or expired session token")
            }
            Self::Token(TokenError::Signing(_)) => ErrorBody::internal(),
            Self::NotFound(msg) => ErrorBody::new("not_found", msg),
            Self::BadRequest(msg) => ErrorBody::new("validation", msg),
            Self::Internal(_) => ErrorBody::internal(),
        }
    }
}

const fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::BAD_REQUEST,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn repository_body(err: RepositoryError) -> ErrorBody {
    match err {
        RepositoryError::NotFound => ErrorBody::new("not_found", "resource not found"),
        RepositoryError::Conflict(msg) => ErrorBody::new("conflict", msg),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => ErrorBody::internal(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(self.into_body())).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
