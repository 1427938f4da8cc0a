//! Auth handlers: register, login, refresh, logout.
//!
//! The refresh token travels only in an HTTP-only cookie; the access token
//! only in response bodies.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use authgate_auth::LogoutOutcome;

use crate::dto::{AccessTokenResponse, CredentialsRequest, MessageResponse};
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .session_manager
        .register(&req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<(CookieJar, Json<AccessTokenResponse>), ApiError> {
    let tokens = state
        .session_manager
        .login(&req.email, &req.password)
        .await?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh.token));
    Ok((
        jar,
        Json(AccessTokenResponse {
            access_token: tokens.access.token,
        }),
    ))
}

/// POST /refresh
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AccessTokenResponse>), ApiError> {
    let presented = presented_refresh_token(&state, &jar);
    let outcome = state
        .session_manager
        .refresh(presented.as_deref())
        .await?;

    let jar = match outcome.rotated_refresh {
        Some(rotated) => jar.add(refresh_cookie(&state, rotated.token)),
        None => jar,
    };

    Ok((
        jar,
        Json(AccessTokenResponse {
            access_token: outcome.access.token,
        }),
    ))
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, ApiError> {
    let presented = presented_refresh_token(&state, &jar);

    match state.session_manager.logout(presented.as_deref()).await? {
        LogoutOutcome::NoSession => Ok(StatusCode::NO_CONTENT.into_response()),
        LogoutOutcome::Cleared { .. } => {
            let removal = Cookie::build(state.config.cookie.name.clone())
                .path(state.config.cookie.path.clone())
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(state.config.cookie_secure());
            let jar = jar.remove(removal);
            Ok((jar, Json(MessageResponse::new("Logged out successfully"))).into_response())
        }
    }
}

fn presented_refresh_token(state: &AppState, jar: &CookieJar) -> Option<String> {
    jar.get(&state.config.cookie.name)
        .map(|cookie| cookie.value().to_owned())
}

fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.cookie.name.clone(), token))
        .path(state.config.cookie.path.clone())
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.cookie_secure())
        .build()
}
