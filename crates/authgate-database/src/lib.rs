//! # authgate-database
//!
//! The credential store behind AuthGate: the [`CredentialStore`] contract,
//! a PostgreSQL implementation, an in-memory implementation for single-node
//! demos and tests, and the provider dispatch that picks one from config.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::connect_pool;
pub use memory::MemoryCredentialStore;
pub use provider::connect_store;
pub use repositories::UserRepository;
pub use store::CredentialStore;
