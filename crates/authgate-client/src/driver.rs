//! Session driver: login/refresh/logout state plus the protected call.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;

/// Default AuthGate server address.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenBody {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Identity granted by the protected resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtectedUser {
    /// Email the access token was issued for.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Body of a successful protected call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtectedResource {
    /// Grant message.
    pub message: String,
    /// The identity behind the access token.
    pub user: ProtectedUser,
}

/// Client-side session over the AuthGate API.
///
/// The session is either absent or present (an access token is held). It
/// becomes present on login or refresh and absent on logout or a failed
/// refresh. Expiry is only noticed reactively, when the server rejects the
/// token.
#[derive(Debug, Clone)]
pub struct SessionDriver {
    http: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl SessionDriver {
    /// Creates a driver for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        // Endpoints are joined relative to the base, which needs a trailing slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let http = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            http,
            base_url: url,
            access_token: None,
        })
    }

    /// Whether an access token is currently held.
    pub fn has_session(&self) -> bool {
        self.access_token.is_some()
    }

    /// The server this driver talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|_| ClientError::InvalidUrl(format!("{}{path}", self.base_url)))
    }

    /// Registers a new account. Does not log in.
    pub async fn register(&mut self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.endpoint("register")?)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let body: MessageBody = decode(response).await?;
        Ok(body.message)
    }

    /// Logs in and holds the returned access token.
    ///
    /// The refresh token arrives as a cookie and stays in the HTTP client.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint("login")?)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let body: AccessTokenBody = decode(response).await?;
        self.access_token = Some(body.access_token);
        debug!("Logged in");
        Ok(())
    }

    /// Exchanges the refresh cookie for a new access token.
    ///
    /// Any failure ends the session. A rejected refresh yields
    /// [`ClientError::SessionExpired`]; server and transport errors are
    /// returned as they are.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.request_access_token().await {
            Ok(token) => {
                self.access_token = Some(token);
                debug!("Access token refreshed");
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Refresh failed, dropping session");
                self.access_token = None;
                Err(e)
            }
        }
    }

    async fn request_access_token(&self) -> Result<String, ClientError> {
        let response = self.http.post(self.endpoint("refresh")?).send().await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(ClientError::SessionExpired);
        }

        let body: AccessTokenBody = decode(response).await?;
        Ok(body.access_token)
    }

    /// Calls the protected resource.
    ///
    /// On a 401 the driver refreshes once and retries once. A second 401 is
    /// returned as is; it never triggers another refresh.
    pub async fn access_protected(&mut self) -> Result<ProtectedResource, ClientError> {
        let mut retried = false;

        loop {
            let mut request = self.http.get(self.endpoint("protected")?);
            if let Some(token) = &self.access_token {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            let response = request.send().await?;

            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                debug!("Access token rejected, refreshing");
                self.refresh().await?;
                continue;
            }

            return decode(response).await;
        }
    }

    /// Ends the session on the server and forgets the access token.
    ///
    /// The local token is dropped even when the server call fails.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.access_token = None;

        let response = self.http.post(self.endpoint("logout")?).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let _: MessageBody = decode(response).await?;
        debug!("Logged out");
        Ok(())
    }
}

/// Decodes a success body or turns an error status into [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let fallback = status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string();
    let (code, message) = match response.json::<ErrorBody>().await {
        Ok(body) => (body.error, body.message.unwrap_or(fallback)),
        Err(_) => (None, fallback),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}
