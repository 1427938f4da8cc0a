//! JWT token issuance, verification, and claims.

pub mod claims;
pub mod error;
pub mod issuer;
pub mod verifier;

pub use claims::{Claims, TokenKind};
pub use error::TokenError;
pub use issuer::{IssuedToken, TokenIssuer};
pub use verifier::TokenVerifier;
