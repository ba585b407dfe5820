//! Authentication error types.

use thiserror::Error;

use vestra_core::EmailError;

use crate::db::RepositoryError;

/// A single failed validation check, tied to the request field it concerns.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    /// Name of the offending request field.
    pub field: &'static str,
    /// Human-readable description of what failed.
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors from the authentication and account service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more request fields failed validation, reported as a batch.
    #[error("request validation failed")]
    Validation(Vec<FieldError>),

    /// Email address failed to parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Username outside the allowed length range.
    #[error("username validation failed: {0}")]
    InvalidUsername(String),

    /// Email address already belongs to another account.
    #[error("email already in use")]
    EmailTaken,

    /// No account matches the given email or id.
    #[error("user not found")]
    UserNotFound,

    /// Wrong password for an existing account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
