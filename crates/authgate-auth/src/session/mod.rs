//! Session lifecycle management: registration, login, refresh and logout.

pub mod manager;

pub use manager::{LoginTokens, LogoutOutcome, RefreshOutcome, SessionManager};
