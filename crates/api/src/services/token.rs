//! Stateless session tokens.
//!
//! A session is a signed JWT delivered via cookie and never stored
//! server-side; validity is purely cryptographic plus expiry. Logout only
//! clears the cookie, so an already-issued token stays valid until it
//! expires. That is a known limitation of the stateless design, carried
//! deliberately rather than papered over with a revocation table.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vestra_core::UserId;

/// Errors from issuing or verifying session tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token could not be signed.
    #[error("failed to sign session token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Token is malformed, incorrectly signed, or expired.
    #[error("invalid or expired session token")]
    Invalid,
}

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub sub: String,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Sign a session token for a user.
///
/// # Errors
///
/// Returns `TokenError::Signing` if the JWT cannot be encoded.
pub fn issue(
    user_id: UserId,
    secret: &SecretString,
    ttl: chrono::Duration,
) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    let key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    encode(&Header::default(), &claims, &key).map_err(TokenError::Signing)
}

/// Verify a session token and extract the authenticated user id.
///
/// # Errors
///
/// Returns `TokenError::Invalid` for any malformed, mis-signed, or expired
/// token. Callers do not learn which check failed.
pub fn verify(token: &str, secret: &SecretString) -> Result<UserId, TokenError> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let data =
        decode::<Claims>(token, &key, &Validation::default()).map_err(|_| TokenError::Invalid)?;

    let id = data
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| TokenError::Invalid)?;

    Ok(UserId::new(id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_secret() -> SecretString {
        SecretString::from("kJ8#mN2$pQ5&rT9@wX3!zB6^cF0*eH4%")
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let secret = test_secret();
        let token = issue(UserId::new(42), &secret, chrono::Duration::days(1)).unwrap();

        let user_id = verify(&token, &secret).unwrap();
        assert_eq!(user_id, UserId::new(42));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issue(UserId::new(1), &test_secret(), chrono::Duration::days(1)).unwrap();

        let other_secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%");
        assert!(matches!(
            verify(&token, &other_secret),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let secret = test_secret();
        // Issued well past the default leeway window
        let token = issue(UserId::new(1), &secret, chrono::Duration::days(-2)).unwrap();

        assert!(matches!(verify(&token, &secret), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            verify("not-a-token", &test_secret()),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_claims_subject_is_user_id() {
        let secret = test_secret();
        let token = issue(UserId::new(7), &secret, chrono::Duration::days(1)).unwrap();

        let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
        let data = decode::<Claims>(&token, &key, &Validation::default()).unwrap();
        assert_eq!(data.claims.sub, "7");
        assert!(data.claims.exp > data.claims.iat);
    }
}
