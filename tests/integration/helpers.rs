//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use authgate_api::AppState;
use authgate_core::config::{AppConfig, HashCostConfig};
use authgate_database::MemoryCredentialStore;

/// Configuration used by every test app: defaults with the cheapest hash cost.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.hash_cost = HashCostConfig::minimal();
    config
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The in-memory store behind the router, for direct inspection
    pub store: MemoryCredentialStore,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryCredentialStore::new();
        let state = AppState::new(config.clone(), Arc::new(store.clone()))
            .expect("Failed to build app state");

        Self {
            router: authgate_api::build_app(state),
            store,
            config,
        }
    }

    /// POST /register
    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        let body = serde_json::json!({ "email": email, "password": password });
        self.request("POST", "/register", Some(body), None, None)
            .await
    }

    /// POST /login, asserting success
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .request("POST", "/login", Some(body), None, None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response
    }

    /// POST /refresh with an optional refresh cookie value
    pub async fn refresh(&self, refresh_token: Option<&str>) -> TestResponse {
        self.request("POST", "/refresh", None, None, refresh_token)
            .await
    }

    /// POST /logout with an optional refresh cookie value
    pub async fn logout(&self, refresh_token: Option<&str>) -> TestResponse {
        self.request("POST", "/logout", None, None, refresh_token)
            .await
    }

    /// GET /protected with an optional bearer token
    pub async fn protected(&self, access_token: Option<&str>) -> TestResponse {
        self.request("GET", "/protected", None, access_token, None)
            .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        bearer: Option<&str>,
        refresh_cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = bearer {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(token) = refresh_cookie {
            req = req.header(
                header::COOKIE,
                format!("{}={token}", self.config.cookie.name),
            );
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body (`Null` when empty)
    pub body: Value,
}

impl TestResponse {
    /// The `accessToken` field of the body
    pub fn access_token(&self) -> String {
        self.body
            .get("accessToken")
            .and_then(|v| v.as_str())
            .expect("No accessToken in response")
            .to_string()
    }

    /// The raw `Set-Cookie` header for `name`, if one was sent
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{name}=")))
            .map(String::from)
    }

    /// The value of the `refreshToken` cookie set by this response
    pub fn refresh_cookie(&self) -> Option<String> {
        let raw = self.set_cookie("refreshToken")?;
        let pair = raw.split(';').next()?;
        let (_, value) = pair.split_once('=')?;
        Some(value.to_string())
    }

    /// The `message` field of the body
    pub fn message(&self) -> &str {
        self.body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

/// Serve a fresh app on an ephemeral local port and return its base URL
pub async fn spawn_server(config: AppConfig) -> (String, MemoryCredentialStore) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    let store = MemoryCredentialStore::new();
    let state =
        AppState::new(config, Arc::new(store.clone())).expect("Failed to build app state");

    tokio::spawn(async move {
        let _ = authgate_api::serve(listener, state, std::future::pending()).await;
    });

    (format!("http://{addr}"), store)
}

/// Serve an arbitrary router on an ephemeral local port and return its base URL
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{addr}")
}
