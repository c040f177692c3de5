//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the token/password primitives.

pub mod auth;

pub use auth::AuthService;
