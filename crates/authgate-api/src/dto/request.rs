//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /register` and `POST /login`.
///
/// Missing fields deserialize as empty strings so they fail the same
/// validation as any other malformed input instead of a decoder rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    /// Email address, used verbatim as the account key.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}
