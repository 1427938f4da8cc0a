//! Integration tests for the register/login/refresh/logout flow.

use axum::http::StatusCode;

use authgate_auth::{TokenKind, TokenVerifier};
use authgate_database::CredentialStore;

use crate::helpers::{TestApp, test_config};

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = app.register("a@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(!response.message().is_empty());
    let user = app.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(user.refresh_token.is_none());
    assert_ne!(user.password_hash, "secret1");
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;

    let response = app.register("a@x.com", "secret1").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "CONFLICT");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let bad_email = app.register("not-an-email", "secret1").await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["error"], "VALIDATION_ERROR");

    let short_password = app.register("a@x.com", "12345").await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(short_password.body["error"], "VALIDATION_ERROR");

    let missing_fields = app
        .request("POST", "/register", Some(serde_json::json!({})), None, None)
        .await;
    assert_eq!(missing_fields.status, StatusCode::BAD_REQUEST);

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_login_returns_token_for_submitted_email() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;

    let response = app.login("a@x.com", "secret1").await;

    let verifier = TokenVerifier::new(&app.config.auth);
    let claims = verifier
        .verify(&response.access_token(), TokenKind::Access)
        .unwrap();
    assert_eq!(claims.email, "a@x.com");

    // The refresh token never appears in the body.
    assert!(response.body.get("refreshToken").is_none());
}

#[tokio::test]
async fn test_login_sets_http_only_strict_cookie() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;

    let response = app.login("a@x.com", "secret1").await;

    let cookie = response.set_cookie("refreshToken").expect("No refresh cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));

    let stored = app.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(stored.refresh_token, response.refresh_cookie());
}

#[tokio::test]
async fn test_cookie_is_secure_in_production() {
    let mut config = test_config();
    config.environment = "production".to_string();
    let app = TestApp::with_config(config);
    app.register("a@x.com", "secret1").await;

    let response = app.login("a@x.com", "secret1").await;

    let cookie = response.set_cookie("refreshToken").expect("No refresh cookie");
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;
    let credentials = |email: &str, password: &str| {
        serde_json::json!({ "email": email, "password": password })
    };

    let unknown = app
        .request("POST", "/login", Some(credentials("b@x.com", "secret1")), None, None)
        .await;
    let wrong = app
        .request("POST", "/login", Some(credentials("a@x.com", "wrong!!")), None, None)
        .await;

    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
    assert!(unknown.set_cookie("refreshToken").is_none());
}

#[tokio::test]
async fn test_refresh_without_cookie_is_unauthorized() {
    let app = TestApp::new();

    let response = app.refresh(None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_refresh_with_garbage_is_forbidden() {
    let app = TestApp::new();

    let response = app.refresh(Some("garbage")).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;
    let login = app.login("a@x.com", "secret1").await;
    let refresh_token = login.refresh_cookie().unwrap();

    let response = app.refresh(Some(&refresh_token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.access_token();
    assert_ne!(access, login.access_token());
    assert_eq!(app.protected(Some(&access)).await.status, StatusCode::OK);

    // Without rotation the refresh cookie is left alone.
    assert!(response.set_cookie("refreshToken").is_none());
    assert_eq!(app.refresh(Some(&refresh_token)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_old_refresh_token_rejected_after_new_login() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;

    let first = app.login("a@x.com", "secret1").await;
    let second = app.login("a@x.com", "secret1").await;

    let stale = app.refresh(first.refresh_cookie().as_deref()).await;
    assert_eq!(stale.status, StatusCode::FORBIDDEN);

    let current = app.refresh(second.refresh_cookie().as_deref()).await;
    assert_eq!(current.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_then_refresh_is_forbidden() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;
    let login = app.login("a@x.com", "secret1").await;
    let refresh_token = login.refresh_cookie().unwrap();

    let logout = app.logout(Some(&refresh_token)).await;
    assert_eq!(logout.status, StatusCode::OK);
    let removal = logout.set_cookie("refreshToken").expect("Cookie not cleared");
    assert!(removal.contains("Max-Age=0"));

    let response = app.refresh(Some(&refresh_token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_logout_without_cookie_is_no_content() {
    let app = TestApp::new();

    let response = app.logout(None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.set_cookie("refreshToken").is_none());
}

#[tokio::test]
async fn test_logout_with_unknown_token_changes_nothing() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;
    let login = app.login("a@x.com", "secret1").await;

    let response = app.logout(Some("someone-elses-token")).await;
    assert_eq!(response.status, StatusCode::OK);

    let user = app.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(user.refresh_token, login.refresh_cookie());
}

#[tokio::test]
async fn test_refresh_rotation_when_enabled() {
    let mut config = test_config();
    config.auth.rotate_refresh_tokens = true;
    let app = TestApp::with_config(config);
    app.register("a@x.com", "secret1").await;
    let login = app.login("a@x.com", "secret1").await;
    let initial = login.refresh_cookie().unwrap();

    let response = app.refresh(Some(&initial)).await;
    assert_eq!(response.status, StatusCode::OK);
    let rotated = response.refresh_cookie().expect("No rotated cookie");
    assert_ne!(rotated, initial);

    assert_eq!(app.refresh(Some(&initial)).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.refresh(Some(&rotated)).await.status, StatusCode::OK);
}
