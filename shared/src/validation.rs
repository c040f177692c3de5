//! Input validation functions
//!
//! Checks applied to credential payloads before they reach the
//! authentication core. Uses the `validator` crate for email syntax.

use crate::errors::ValidationError;
use validator::ValidateEmail;

/// bcrypt ignores everything past this many bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Maximum stored email length
pub const MAX_EMAIL_LEN: usize = 255;

/// Trim surrounding whitespace from an email address.
///
/// Case is preserved for storage; comparisons use [`email_key`].
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Case-insensitive comparison key for an email address
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email cannot be empty"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::new("email", "Email too long"));
    }
    if !email.validate_email() {
        return Err(ValidationError::new("email", "Invalid email format"));
    }
    Ok(())
}

/// Validate a password supplied at registration
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "Password cannot be empty"));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new(
            "password",
            "Password must be at most 72 bytes",
        ));
    }
    Ok(())
}
