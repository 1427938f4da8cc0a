//! Integration tests for the protected resource and the health probe.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use authgate_auth::{ResourceGuard, TokenIssuer, TokenKind};

use crate::helpers::{TestApp, test_config};

#[tokio::test]
async fn test_protected_grants_access() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;
    let login = app.login("a@x.com", "secret1").await;

    let response = app.protected(Some(&login.access_token())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Access granted");
    assert_eq!(response.body["user"]["email"], "a@x.com");
    assert!(response.body["user"]["exp"].as_i64().is_some());
}

#[tokio::test]
async fn test_protected_without_token_is_unauthenticated() {
    let app = TestApp::new();

    let response = app.protected(None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_protected_rejects_garbage_token() {
    let app = TestApp::new();

    let response = app.protected(Some("not.a.jwt")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_protected_rejects_refresh_token() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;
    let login = app.login("a@x.com", "secret1").await;
    let refresh_token = login.refresh_cookie().unwrap();

    let response = app.protected(Some(&refresh_token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_rejects_expired_token() {
    let app = TestApp::new();
    let issuer = TokenIssuer::new(&app.config.auth);
    let stale = issuer
        .issue_at(
            TokenKind::Access,
            "a@x.com",
            Utc::now() - Duration::minutes(16),
        )
        .unwrap();

    let response = app.protected(Some(&stale.token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_access_token_survives_logout_until_expiry() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;
    let login = app.login("a@x.com", "secret1").await;
    let access = login.access_token();

    app.logout(login.refresh_cookie().as_deref()).await;

    let response = app.protected(Some(&access)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[test]
fn test_access_token_expiry_boundary() {
    let config = test_config();
    let issuer = TokenIssuer::new(&config.auth);
    let guard = ResourceGuard::new(&config.auth);
    let token = issuer.issue_access("a@x.com").unwrap();
    let header = format!("Bearer {}", token.token);
    let exp = token.claims.exp;

    assert!(guard.authorize_at(Some(&header), exp).is_ok());
    assert!(guard.authorize_at(Some(&header), exp + 1).is_err());
}

#[tokio::test]
async fn test_health_reports_store() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None, None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "ok");
}
