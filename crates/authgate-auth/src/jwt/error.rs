//! Token verification failures.

use thiserror::Error;

use super::claims::TokenKind;

/// Why a presented token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The signature does not match the key for the expected token kind.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token verified but is past its expiry.
    #[error("token has expired")]
    Expired,
    /// The token could not be parsed as a JWT with our claims.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The token verified but carries the other token kind.
    #[error("expected {expected} token, got {actual}")]
    WrongKind {
        /// The kind the caller asked for.
        expected: TokenKind,
        /// The kind found in the claims.
        actual: TokenKind,
    },
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}
