//! `AuthUser` extractor: pulls the access token from the Authorization header and verifies it.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use authgate_auth::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified access token claims available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A non-UTF-8 header value counts as absent.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let claims = state.resource_guard.authorize(header)?;
        Ok(AuthUser(claims))
    }
}
