//! JWT claims structure shared by access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The identity this token is bound to.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token ID. Keeps two tokens minted in the same second distinct.
    pub jti: Uuid,
    /// Token type: "access" or "refresh".
    pub token_type: TokenKind,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived access token for resource calls.
    Access,
    /// Long-lived refresh token for minting new access tokens.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

impl Claims {
    /// Whether the token is past its expiry at `now` (seconds since epoch).
    ///
    /// A token is still valid at exactly `exp` and expired strictly after.
    pub fn is_expired_at(&self, now: i64, leeway: u64) -> bool {
        now > self.exp.saturating_add(leeway as i64)
    }
}
