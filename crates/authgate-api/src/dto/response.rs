//! Response DTOs.

use serde::{Deserialize, Serialize};

use authgate_auth::Claims;

/// A bare human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    /// Short-lived access token for the `Authorization` header.
    pub access_token: String,
}

/// Body of `GET /protected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    /// Grant message.
    pub message: String,
    /// The verified access token claims.
    pub user: Claims,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// `ok` or `unavailable`.
    pub store: String,
}
