//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::CredentialsRequest;
pub use response::{AccessTokenResponse, HealthResponse, MessageResponse, ProtectedResponse};
