//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vestra_core::{Email, UserId};

/// A registered user (domain type).
///
/// The password hash never leaves the repository layer, so this type has no
/// field for it and can be serialized straight into profile responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub username: String,
    /// Filename of the profile picture under the upload directory.
    pub profile_picture: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The subset of user fields returned from login.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// User's email address.
    pub email: Email,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}
