//! # authgate-auth
//!
//! The token lifecycle of AuthGate.
//!
//! ## Modules
//!
//! - `jwt`: signed access/refresh token issuance and verification
//! - `password`: Argon2id hashing and registration input validation
//! - `session`: register, login, refresh, and logout against the credential store
//! - `guard`: stateless access token checks for protected resources

pub mod guard;
pub mod jwt;
pub mod password;
pub mod session;

pub use guard::ResourceGuard;
pub use jwt::{Claims, IssuedToken, TokenError, TokenIssuer, TokenKind, TokenVerifier};
pub use password::{CredentialValidator, PasswordHasher};
pub use session::{LoginTokens, LogoutOutcome, RefreshOutcome, SessionManager};
