//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user, keyed by email.
///
/// `refresh_token` mirrors the single refresh token currently honored for
/// this user. It is set on login, cleared on logout, and left untouched by
/// access-token-only operations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Email address (natural key).
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The refresh token currently honored for this user, if any.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `token` is exactly the refresh token stored for this user.
    pub fn holds_refresh_token(&self, token: &str) -> bool {
        self.refresh_token.as_deref() == Some(token)
    }

    /// Whether this user currently has an active refresh session.
    pub fn has_session(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}
