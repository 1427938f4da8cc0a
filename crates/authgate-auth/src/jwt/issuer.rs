//! Signed token creation with per-kind secrets and fixed TTLs.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

use super::claims::{Claims, TokenKind};

/// Creates signed JWT access and refresh tokens.
///
/// Access and refresh tokens are signed with different secrets, so a leaked
/// access key cannot forge refresh tokens and vice versa.
#[derive(Clone)]
pub struct TokenIssuer {
    /// HMAC key for access tokens.
    access_key: EncodingKey,
    /// HMAC key for refresh tokens.
    refresh_key: EncodingKey,
    /// Access token TTL.
    access_ttl: Duration,
    /// Refresh token TTL.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// A freshly signed token together with its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The encoded JWT.
    pub token: String,
    /// The claims that were signed.
    pub claims: Claims,
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            access_ttl: Duration::seconds(config.access_token_ttl_seconds as i64),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl_seconds as i64),
        }
    }

    /// Issues an access token for `email`, valid from now.
    pub fn issue_access(&self, email: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(TokenKind::Access, email, Utc::now())
    }

    /// Issues a refresh token for `email`, valid from now.
    pub fn issue_refresh(&self, email: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(TokenKind::Refresh, email, Utc::now())
    }

    /// Issues a token of the given kind as if minted at `issued_at`.
    pub fn issue_at(
        &self,
        kind: TokenKind,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let (key, ttl) = match kind {
            TokenKind::Access => (&self.access_key, self.access_ttl),
            TokenKind::Refresh => (&self.refresh_key, self.refresh_ttl),
        };

        let claims = Claims {
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: Uuid::new_v4(),
            token_type: kind,
        };

        let token = encode(&Header::default(), &claims, key)
            .map_err(|e| AppError::internal(format!("Failed to encode {kind} token: {e}")))?;

        Ok(IssuedToken { token, claims })
    }
}
