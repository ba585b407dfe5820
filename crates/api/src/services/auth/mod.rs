//! Authentication and account service.
//!
//! Handles registration, login, and the authenticated profile updates
//! (password, username, email). Passwords are hashed with Argon2id and
//! never leave the database layer except as opaque hashes.

mod error;

pub use error::{AuthError, FieldError};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use vestra_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Allowed username length range (inclusive).
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 30;

/// Authentication service.
///
/// Handles user registration, login, and account detail changes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    // =========================================================================
    // Registration and Login
    // =========================================================================

    /// Register a new user with email, username, and password.
    ///
    /// All field checks run before anything is reported, so a request with
    /// several bad fields gets every failure back in one response.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with one entry per failed field.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let errors = validate_registration(email, username, password);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        // The batch above already proved this parses
        let email = Email::parse(email)?;

        let password_hash = hash_password(password.to_owned()).await?;

        let user = self
            .users
            .create(&email, username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the email or password field is
    /// malformed. Returns `AuthError::UserNotFound` if no account matches
    /// the email, and `AuthError::InvalidCredentials` if the password is
    /// wrong. Callers map these to distinct status codes.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let errors = validate_login(email, password);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .find_for_login(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password.to_owned(), password_hash).await?;

        Ok(user)
    }

    // =========================================================================
    // Account Updates
    // =========================================================================

    /// Change the user's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the new password is too short.
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    pub async fn change_password(&self, user_id: UserId, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;

        let password_hash = hash_password(password.to_owned()).await?;

        self.users
            .update_password(user_id, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(())
    }

    /// Change the user's display name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the name is outside the
    /// allowed length range. Returns `AuthError::UserNotFound` if the
    /// account no longer exists.
    pub async fn change_username(&self, user_id: UserId, username: &str) -> Result<(), AuthError> {
        validate_username(username)?;

        self.users
            .update_username(user_id, username)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(())
    }

    /// Change the user's email address after re-verifying their password.
    ///
    /// The target account comes from the session, never from the request
    /// body, so a user can only ever re-key their own address.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the new address fails to parse.
    /// Returns `AuthError::EmailTaken` if another account already uses it.
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn change_email(
        &self,
        user_id: UserId,
        new_email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let new_email = Email::parse(new_email)?;

        if self.users.email_in_use(&new_email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self
            .users
            .get_password_hash(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password.to_owned(), password_hash).await?;

        // The unique index still backstops a concurrent registration
        self.users
            .update_email(user_id, &new_email)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(())
    }
}

/// Validate all registration fields, collecting every failure.
fn validate_registration(email: &str, username: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(e) = Email::parse(email) {
        errors.push(FieldError::new("email", e.to_string()));
    }

    if username.is_empty() {
        errors.push(FieldError::new("username", "username must not be empty"));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }

    errors
}

/// Validate login fields, collecting every failure.
fn validate_login(email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(e) = Email::parse(email) {
        errors.push(FieldError::new("email", e.to_string()));
    }

    if password.is_empty() {
        errors.push(FieldError::new("password", "password must not be empty"));
    }

    errors
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Validate username length.
fn validate_username(username: &str) -> Result<(), AuthError> {
    let length = username.chars().count();
    if length < MIN_USERNAME_LENGTH || length > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password with Argon2id.
///
/// Argon2 holds a core for tens of milliseconds per call, so the work
/// runs on the blocking pool instead of an async worker thread.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password_sync(&password))
        .await
        .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a stored hash, on the blocking pool.
async fn verify_password(password: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || verify_password_sync(&password, &hash))
        .await
        .map_err(|_| AuthError::PasswordHash)?
}

fn hash_password_sync(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password_sync(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_batch_collects_all_failures() {
        let errors = validate_registration("not-an-email", "", "abc");
        assert_eq!(errors.len(), 3);

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["email", "username", "password"]);
    }

    #[test]
    fn test_registration_accepts_valid_fields() {
        let errors = validate_registration("anna@example.com", "anna", "secret1");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_registration_rejects_five_char_password() {
        let errors = validate_registration("anna@example.com", "anna", "12345");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let errors = validate_login("", "");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_login_accepts_valid_fields() {
        assert!(validate_login("anna@example.com", "pw").is_empty());
    }

    #[test]
    fn test_validate_username_length_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"x".repeat(30)).is_ok());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password_sync("hunter62").unwrap();
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password_sync("hunter62", &hash).is_ok());
        assert!(matches!(
            verify_password_sync("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password_sync("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_blocking_wrappers_roundtrip() {
        let hash = hash_password("hunter62".to_owned()).await.unwrap();
        assert!(verify_password("hunter62".to_owned(), hash).await.is_ok());
    }
}
