//! Credential store selection from configuration.

use std::sync::Arc;

use tracing::info;

use authgate_core::config::DatabaseConfig;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;

use crate::connection::connect_pool;
use crate::memory::MemoryCredentialStore;
use crate::migration::run_migrations;
use crate::repositories::UserRepository;
use crate::store::CredentialStore;

/// Build the credential store named by `config.provider`.
///
/// For PostgreSQL this connects the pool and, when enabled, applies pending
/// migrations before returning.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.provider.as_str() {
        "postgres" => {
            let pool = connect_pool(config).await?;
            if config.run_migrations {
                run_migrations(&pool).await?;
            }
            Arc::new(UserRepository::new(pool))
        }
        "memory" => {
            info!("Using in-memory credential store; users are lost on restart");
            Arc::new(MemoryCredentialStore::new())
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            )));
        }
    };

    Ok(store)
}
