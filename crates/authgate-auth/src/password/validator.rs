//! Registration input checks.

use validator::ValidateEmail;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

/// Validates registration input before any store access.
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl CredentialValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Checks that `email` is well-formed and `password` is long enough.
    ///
    /// Length is counted in characters, not bytes.
    pub fn validate_registration(&self, email: &str, password: &str) -> Result<(), AppError> {
        if !email.validate_email() || !has_top_level_domain(email) {
            return Err(AppError::validation("Invalid email address"));
        }

        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        Ok(())
    }
}

/// Requires a dotted domain whose last label is at least two letters
/// (or an `xn--` IDN label), so `a@localhost` and `a@x` are rejected.
fn has_top_level_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty() {
        return false;
    }
    let tld = tld.to_ascii_lowercase();
    (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
        || (tld.starts_with("xn--") && tld.len() > 4)
}
