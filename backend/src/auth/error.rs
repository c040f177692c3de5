//! Authentication error taxonomy
//!
//! Every entry point of the authentication core returns one of these.
//! Variants carry no framework types; the HTTP mapping lives in
//! `crate::error`.

use crate::repositories::RepositoryError;
use storefront_shared::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Inactive user")]
    AccountInactive,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    /// Malformed, unsigned, expired or foreign token, or one whose
    /// subject no longer maps to an active user
    #[error("Invalid token")]
    InvalidToken,

    #[error("Refresh tokens cannot access this resource")]
    WrongTokenType,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountInactive => "ACCOUNT_INACTIVE",
            AuthError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::WrongTokenType => "WRONG_TOKEN_TYPE",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Repository(_) => "DATABASE_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
