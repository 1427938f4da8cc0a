//! Stateless access token checks for protected resources.
//!
//! The guard never consults the credential store: a live access token stays
//! valid until its own expiry even after logout. Revocation takes effect at
//! the next refresh.

use chrono::Utc;
use tracing::debug;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

use crate::jwt::{Claims, TokenKind, TokenVerifier};

/// Authorization scheme expected in the `Authorization` header.
const BEARER_SCHEME: &str = "Bearer";

/// Verifies access tokens presented in `Authorization` headers.
#[derive(Debug, Clone)]
pub struct ResourceGuard {
    verifier: TokenVerifier,
}

impl ResourceGuard {
    /// Creates a guard from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            verifier: TokenVerifier::new(config),
        }
    }

    /// Authorizes a request from its raw `Authorization` header value.
    ///
    /// Fails with `Unauthenticated` when no bearer token is present and with
    /// `Forbidden` when the token is invalid or expired.
    pub fn authorize(&self, header: Option<&str>) -> Result<Claims, AppError> {
        self.authorize_at(header, Utc::now().timestamp())
    }

    /// Like [`authorize`](Self::authorize), evaluated at `now` (seconds since epoch).
    pub fn authorize_at(&self, header: Option<&str>, now: i64) -> Result<Claims, AppError> {
        let token = header
            .and_then(bearer_token)
            .ok_or_else(|| AppError::unauthenticated("Access token missing"))?;

        self.verifier
            .verify_at(token, TokenKind::Access, now)
            .map_err(|e| {
                debug!(error = %e, "Access token rejected");
                AppError::forbidden("Invalid or expired access token")
            })
    }
}

/// Extracts the token from `Bearer <token>`.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
