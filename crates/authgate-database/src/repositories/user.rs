//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_entity::user::{CreateUser, User};

use crate::store::CredentialStore;

/// PostgreSQL-backed credential store.
///
/// Each method is a single statement, so row-level locking in PostgreSQL
/// provides the atomicity the [`CredentialStore`] contract requires.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict("User already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    async fn replace_refresh_token(&self, email: &str, token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE email = $1",
        )
        .bind(email)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store refresh token", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn compare_and_swap_refresh_token(
        &self,
        email: &str,
        expected: &str,
        new: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $3, updated_at = NOW() \
             WHERE email = $1 AND refresh_token = $2",
        )
        .bind(email)
        .bind(expected)
        .bind(new)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to swap refresh token", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_refresh_token(&self, token: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "UPDATE users SET refresh_token = NULL, updated_at = NOW() \
             WHERE refresh_token = $1 RETURNING email",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear refresh token", e)
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
