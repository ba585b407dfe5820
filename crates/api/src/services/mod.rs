//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login, and account detail changes
//! - `token` - Stateless JWT session tokens

pub mod auth;
pub mod token;

pub use auth::{AuthError, AuthService, FieldError};
pub use token::{Claims, TokenError};
