//! The protected resource.

use axum::Json;

use crate::dto::ProtectedResponse;
use crate::extractors::AuthUser;

/// GET /protected
pub async fn protected(AuthUser(claims): AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted".to_string(),
        user: claims,
    })
}
