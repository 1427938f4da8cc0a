//! Integration tests for AuthGate.

mod helpers;

mod auth_test;
mod client_test;
mod protected_test;
