//! # authgate-api
//!
//! HTTP API layer for AuthGate built on Axum.
//!
//! Provides the register/login/refresh/logout endpoints, the protected
//! resource, a health probe, middleware (CORS, logging), extractors, DTOs,
//! and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, serve};
pub use error::ApiError;
pub use state::AppState;
