//! In-memory credential store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_entity::user::{CreateUser, User};

use crate::store::CredentialStore;

/// In-memory credential store.
///
/// Every operation runs under one lock, so compare-and-set and
/// clear-by-value are trivially atomic. State is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    /// Users keyed by email.
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    /// Whether no users are registered.
    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(email).cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().await;
        if users.contains_key(&data.email) {
            return Err(AppError::conflict("User already exists"));
        }

        let now = Utc::now();
        let user = User {
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.email.clone(), user.clone());
        debug!(total = users.len(), "User inserted into memory store");
        Ok(user)
    }

    async fn replace_refresh_token(&self, email: &str, token: &str) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(email) {
            Some(user) => {
                user.refresh_token = Some(token.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn compare_and_swap_refresh_token(
        &self,
        email: &str,
        expected: &str,
        new: Option<&str>,
    ) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(email) {
            Some(user) if user.holds_refresh_token(expected) => {
                user.refresh_token = new.map(String::from);
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, token: &str) -> AppResult<Option<String>> {
        let mut users = self.users.lock().await;
        let holder = users
            .values_mut()
            .find(|user| user.holds_refresh_token(token));

        Ok(holder.map(|user| {
            user.refresh_token = None;
            user.updated_at = Utc::now();
            user.email.clone()
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
