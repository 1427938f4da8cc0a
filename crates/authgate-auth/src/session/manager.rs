//! Session lifecycle manager: register, login, refresh and logout flows.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;
use authgate_database::CredentialStore;
use authgate_entity::user::{CreateUser, User};

use crate::jwt::{IssuedToken, TokenIssuer, TokenKind, TokenVerifier};
use crate::password::{CredentialValidator, PasswordHasher};

/// Plaintext hashed once to produce the decoy hash for unknown-user logins.
const DECOY_PASSWORD: &str = "authgate-decoy-password";

/// Tokens minted by a successful login.
#[derive(Debug, Clone)]
pub struct LoginTokens {
    /// Short-lived access token, returned in the response body.
    pub access: IssuedToken,
    /// Long-lived refresh token, returned as an HTTP-only cookie.
    pub refresh: IssuedToken,
}

/// Result of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// The new access token.
    pub access: IssuedToken,
    /// Replacement refresh token, present only when rotation is enabled.
    pub rotated_refresh: Option<IssuedToken>,
}

/// What a logout call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// No refresh token was presented; nothing changed.
    NoSession,
    /// The presented token was processed. `email` names the user whose
    /// stored token matched, if any.
    Cleared { email: Option<String> },
}

/// Manages the complete session lifecycle against a credential store.
///
/// A refresh token is honored only while it is byte-for-byte equal to the
/// value stored for its user, so each login or logout revokes every refresh
/// token issued before it.
#[derive(Clone)]
pub struct SessionManager {
    /// Credential persistence.
    store: Arc<dyn CredentialStore>,
    /// Token signing.
    issuer: Arc<TokenIssuer>,
    /// Token verification.
    verifier: Arc<TokenVerifier>,
    /// Password hashing.
    hasher: PasswordHasher,
    /// Registration input checks.
    validator: CredentialValidator,
    /// Hash verified for unknown users so both login failures cost the same.
    decoy_hash: Arc<OnceCell<String>>,
    /// Whether `/refresh` also mints a new refresh token.
    rotate_refresh_tokens: bool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("rotate_refresh_tokens", &self.rotate_refresh_tokens)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager from auth configuration and a store.
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Result<Self, AppError> {
        Ok(Self {
            store,
            issuer: Arc::new(TokenIssuer::new(config)),
            verifier: Arc::new(TokenVerifier::new(config)),
            hasher: PasswordHasher::new(&config.hash_cost)?,
            validator: CredentialValidator::new(config),
            decoy_hash: Arc::new(OnceCell::new()),
            rotate_refresh_tokens: config.rotate_refresh_tokens,
        })
    }

    /// Registers a new user with no active session.
    ///
    /// 1. Validate email format and password length
    /// 2. Reject an existing email
    /// 3. Hash the password off the async runtime
    /// 4. Insert the user row
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.validator.validate_registration(email, password)?;

        if self.store.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash_password(password).await?;

        // The store enforces uniqueness too; a concurrent registration that
        // slipped past the lookup still surfaces as a conflict.
        let user = self
            .store
            .create(&CreateUser {
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(email = %user.email, "User registered");
        Ok(user)
    }

    /// Authenticates a user and starts a new session.
    ///
    /// Overwrites the stored refresh token, which revokes any earlier
    /// session for the same user.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginTokens, AppError> {
        let user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                self.burn_decoy_verification(password).await?;
                debug!("Login rejected: unknown email");
                return Err(AppError::invalid_credentials());
            }
        };

        if !self
            .hasher
            .verify_password(password, &user.password_hash)
            .await?
        {
            debug!(email = %user.email, "Login rejected: password mismatch");
            return Err(AppError::invalid_credentials());
        }

        let access = self.issuer.issue_access(&user.email)?;
        let refresh = self.issuer.issue_refresh(&user.email)?;

        if !self
            .store
            .replace_refresh_token(&user.email, &refresh.token)
            .await?
        {
            warn!(email = %user.email, "User vanished between lookup and token store");
            return Err(AppError::invalid_credentials());
        }

        info!(email = %user.email, replaced_session = user.has_session(), "Login successful");
        Ok(LoginTokens { access, refresh })
    }

    /// Issues a new access token for a presented refresh token.
    ///
    /// Fails with `Unauthorized` when no token is presented, and with
    /// `InvalidToken` when the token does not verify or is no longer the
    /// value stored for its user.
    pub async fn refresh(&self, presented: Option<&str>) -> Result<RefreshOutcome, AppError> {
        let presented = presented
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Refresh token missing"))?;

        let claims = self
            .verifier
            .verify(presented, TokenKind::Refresh)
            .map_err(|e| {
                debug!(error = %e, "Refresh token rejected");
                AppError::invalid_token("Invalid refresh token")
            })?;

        let user = self
            .store
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| AppError::invalid_token("Invalid refresh token"))?;

        if !user.holds_refresh_token(presented) {
            debug!(email = %user.email, "Refresh token superseded or revoked");
            return Err(AppError::invalid_token("Invalid refresh token"));
        }

        let access = self.issuer.issue_access(&user.email)?;

        let rotated_refresh = if self.rotate_refresh_tokens {
            let next = self.issuer.issue_refresh(&user.email)?;
            let swapped = self
                .store
                .compare_and_swap_refresh_token(&user.email, presented, Some(&next.token))
                .await?;
            if !swapped {
                debug!(email = %user.email, "Refresh rotation lost a race");
                return Err(AppError::invalid_token("Invalid refresh token"));
            }
            Some(next)
        } else {
            None
        };

        info!(
            email = %user.email,
            rotated = rotated_refresh.is_some(),
            "Access token refreshed"
        );
        Ok(RefreshOutcome {
            access,
            rotated_refresh,
        })
    }

    /// Ends the session holding `presented`, if any. Idempotent.
    ///
    /// The lookup is by token value, never by the email inside the token, so
    /// a token that is not the stored value cannot clear anyone's session.
    pub async fn logout(&self, presented: Option<&str>) -> Result<LogoutOutcome, AppError> {
        let Some(token) = presented.filter(|token| !token.is_empty()) else {
            return Ok(LogoutOutcome::NoSession);
        };

        let email = self.store.clear_refresh_token(token).await?;
        match &email {
            Some(email) => info!(email = %email, "Logout completed"),
            None => debug!("Logout with a token no user holds"),
        }

        Ok(LogoutOutcome::Cleared { email })
    }

    async fn burn_decoy_verification(&self, password: &str) -> Result<(), AppError> {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.hasher.hash_password(DECOY_PASSWORD))
            .await?;
        self.hasher.verify_password(password, decoy).await?;
        Ok(())
    }
}
