//! Client-side error type.

use thiserror::Error;

/// Failures surfaced by [`SessionDriver`](crate::SessionDriver).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("server returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable code from the error body, if any.
        code: Option<String>,
        /// Human-readable message from the error body.
        message: String,
    },

    /// The access token was rejected and refreshing it failed.
    #[error("session expired")]
    SessionExpired,

    /// The base URL could not be parsed.
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// A flat string suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::SessionExpired => "Session expired, please log in again".to_string(),
            Self::Transport(e) if e.is_decode() => {
                "Unexpected response from the server".to_string()
            }
            Self::Transport(_) => "Could not reach the server".to_string(),
            Self::InvalidUrl(url) => format!("Invalid server URL: {url}"),
        }
    }
}
