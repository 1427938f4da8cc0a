//! Session driver tests against a live server and against scripted fakes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use authgate_client::{ClientError, SessionDriver};
use authgate_database::CredentialStore;

use crate::helpers::{spawn_router, spawn_server, test_config};

#[tokio::test]
async fn test_driver_full_session() {
    let (url, store) = spawn_server(test_config()).await;
    let mut driver = SessionDriver::new(&url).unwrap();

    let message = driver.register("a@x.com", "secret1").await.unwrap();
    assert!(!message.is_empty());
    assert!(!driver.has_session());

    driver.login("a@x.com", "secret1").await.unwrap();
    assert!(driver.has_session());

    let resource = driver.access_protected().await.unwrap();
    assert_eq!(resource.message, "Access granted");
    assert_eq!(resource.user.email, "a@x.com");

    driver.logout().await.unwrap();
    assert!(!driver.has_session());
    let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(user.refresh_token.is_none());

    // The cookie was removed with the logout, so no refresh is possible.
    assert!(matches!(
        driver.refresh().await,
        Err(ClientError::SessionExpired)
    ));
}

#[tokio::test]
async fn test_driver_surfaces_server_errors() {
    let (url, _store) = spawn_server(test_config()).await;
    let mut driver = SessionDriver::new(&url).unwrap();

    driver.register("a@x.com", "secret1").await.unwrap();
    let err = driver.register("a@x.com", "secret1").await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = driver.login("a@x.com", "wrong!!").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(!driver.has_session());
}

#[tokio::test]
async fn test_driver_refreshes_expired_access_token() {
    let mut config = test_config();
    config.auth.access_token_ttl_seconds = 1;
    let (url, _store) = spawn_server(config).await;
    let mut driver = SessionDriver::new(&url).unwrap();

    driver.register("a@x.com", "secret1").await.unwrap();
    driver.login("a@x.com", "secret1").await.unwrap();

    tokio::time::sleep(Duration::from_millis(2100)).await;

    let resource = driver.access_protected().await.unwrap();
    assert_eq!(resource.user.email, "a@x.com");
    assert!(driver.has_session());
}

#[tokio::test]
async fn test_second_login_ends_first_driver_session() {
    let mut config = test_config();
    config.auth.access_token_ttl_seconds = 1;
    let (url, _store) = spawn_server(config).await;
    let mut first = SessionDriver::new(&url).unwrap();
    let mut second = SessionDriver::new(&url).unwrap();

    first.register("a@x.com", "secret1").await.unwrap();
    first.login("a@x.com", "secret1").await.unwrap();
    second.login("a@x.com", "secret1").await.unwrap();

    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert!(matches!(
        first.access_protected().await,
        Err(ClientError::SessionExpired)
    ));
    assert!(!first.has_session());
    assert!(second.access_protected().await.is_ok());
}

#[derive(Clone, Default)]
struct Calls {
    protected: Arc<AtomicUsize>,
    refresh: Arc<AtomicUsize>,
}

/// A server whose protected resource always answers 401.
fn always_unauthorized(calls: Calls) -> Router {
    let protected_calls = calls.protected.clone();
    let refresh_calls = calls.refresh.clone();

    Router::new()
        .route(
            "/login",
            post(|| async { Json(json!({ "accessToken": "initial" })) }),
        )
        .route(
            "/refresh",
            post(move || async move {
                refresh_calls.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "accessToken": "refreshed" }))
            }),
        )
        .route(
            "/protected",
            get(move || async move {
                protected_calls.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "FORBIDDEN", "message": "nope" })),
                )
            }),
        )
}

#[tokio::test]
async fn test_protected_retry_is_bounded() {
    let calls = Calls::default();
    let url = spawn_router(always_unauthorized(calls.clone())).await;
    let mut driver = SessionDriver::new(&url).unwrap();
    driver.login("a@x.com", "secret1").await.unwrap();

    let err = driver.access_protected().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(calls.protected.load(Ordering::SeqCst), 2);
    assert_eq!(calls.refresh.load(Ordering::SeqCst), 1);
    assert!(driver.has_session());
}

#[tokio::test]
async fn test_rejected_refresh_ends_session() {
    let router = Router::new()
        .route(
            "/login",
            post(|| async { Json(json!({ "accessToken": "initial" })) }),
        )
        .route(
            "/refresh",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "INVALID_TOKEN", "message": "Invalid refresh token" })),
                )
            }),
        )
        .route(
            "/protected",
            get(|| async { StatusCode::UNAUTHORIZED }),
        );
    let url = spawn_router(router).await;
    let mut driver = SessionDriver::new(&url).unwrap();
    driver.login("a@x.com", "secret1").await.unwrap();

    let err = driver.access_protected().await.unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired));
    assert!(!driver.has_session());
}

#[tokio::test]
async fn test_failed_refresh_drops_session_without_retry() {
    let calls = Calls::default();
    let protected_calls = calls.protected.clone();
    let router = Router::new()
        .route(
            "/login",
            post(|| async { Json(json!({ "accessToken": "initial" })) }),
        )
        .route(
            "/refresh",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "INTERNAL_ERROR", "message": "Internal server error" })),
                )
            }),
        )
        .route(
            "/protected",
            get(move || async move {
                protected_calls.fetch_add(1, Ordering::SeqCst);
                StatusCode::UNAUTHORIZED
            }),
        );
    let url = spawn_router(router).await;
    let mut driver = SessionDriver::new(&url).unwrap();
    driver.login("a@x.com", "secret1").await.unwrap();

    let err = driver.access_protected().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!driver.has_session());
    assert_eq!(calls.protected.load(Ordering::SeqCst), 1);
}
