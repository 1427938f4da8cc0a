//! Token signature and expiry verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use authgate_core::config::AuthConfig;

use super::claims::{Claims, TokenKind};
use super::error::TokenError;

/// Verifies tokens against the key for their expected kind.
///
/// Expiry is checked here rather than inside `jsonwebtoken` so the clock can
/// be supplied explicitly; a token is accepted at exactly `exp` and rejected
/// strictly after it.
#[derive(Clone)]
pub struct TokenVerifier {
    /// HMAC key for access tokens.
    access_key: DecodingKey,
    /// HMAC key for refresh tokens.
    refresh_key: DecodingKey,
    /// Signature/format validation (expiry disabled, see above).
    validation: Validation,
    /// Tolerated clock skew in seconds.
    leeway: u64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            access_key: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            validation,
            leeway: config.leeway_seconds,
        }
    }

    /// Verifies `token` as a token of `kind` against the current time.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        self.verify_at(token, kind, Utc::now().timestamp())
    }

    /// Verifies `token` as a token of `kind` at `now` (seconds since epoch).
    ///
    /// Checks, in order:
    /// 1. Signature against the key for `kind`
    /// 2. Token type claim matches `kind`
    /// 3. Expiry
    pub fn verify_at(&self, token: &str, kind: TokenKind, now: i64) -> Result<Claims, TokenError> {
        let key = match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };

        let claims = decode::<Claims>(token, key, &self.validation)?.claims;

        if claims.token_type != kind {
            return Err(TokenError::WrongKind {
                expected: kind,
                actual: claims.token_type,
            });
        }

        if claims.is_expired_at(now, self.leeway) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
