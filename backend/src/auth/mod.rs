//! Authentication module
//!
//! Provides bcrypt password hashing, HS256 access/refresh tokens and the
//! request extractor that resolves the calling user.

pub mod error;
pub mod jwt;
mod middleware;
mod password;

pub use error::AuthError;
pub use jwt::{Clock, ManualClock, SystemClock, TokenClaims, TokenCodec, TokenValidationError};
pub use middleware::{bearer_token, AuthUser};
pub use password::PasswordHasher;
