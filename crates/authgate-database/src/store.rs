//! Credential store contract.

use async_trait::async_trait;

use authgate_core::result::AppResult;
use authgate_entity::user::{CreateUser, User};

/// Persistence for `(email, password hash, current refresh token)` rows.
///
/// Implementations must make every method a single atomic step against the
/// backing store. In particular [`compare_and_swap_refresh_token`] must only
/// write when the stored value still equals `expected`, and
/// [`clear_refresh_token`] must match on the token value itself.
///
/// [`compare_and_swap_refresh_token`]: CredentialStore::compare_and_swap_refresh_token
/// [`clear_refresh_token`]: CredentialStore::clear_refresh_token
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Point lookup by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user with no refresh token.
    ///
    /// Fails with a `Conflict` error if the email is already registered.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Overwrite the stored refresh token for `email` (last writer wins).
    ///
    /// Returns `false` if no such user exists.
    async fn replace_refresh_token(&self, email: &str, token: &str) -> AppResult<bool>;

    /// Replace the stored refresh token only if it still equals `expected`.
    ///
    /// Returns `true` if the swap happened.
    async fn compare_and_swap_refresh_token(
        &self,
        email: &str,
        expected: &str,
        new: Option<&str>,
    ) -> AppResult<bool>;

    /// Clear the refresh token of whichever user currently holds exactly
    /// `token`. Returns that user's email, if any.
    async fn clear_refresh_token(&self, token: &str) -> AppResult<Option<String>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
