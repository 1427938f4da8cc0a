//! # authgate-client
//!
//! A session driver for the AuthGate HTTP API.
//!
//! [`SessionDriver`] holds the in-memory access token and a cookie-aware HTTP
//! client; the refresh token lives only in the client's cookie store. The
//! caller owns the driver and passes it by `&mut` to each operation.

pub mod driver;
pub mod error;

pub use driver::{DEFAULT_SERVER_URL, ProtectedResource, ProtectedUser, SessionDriver};
pub use error::ClientError;
