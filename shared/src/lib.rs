//! Storefront Shared Library
//!
//! Framework-free request/response types, user roles and input validation
//! shared by the backend and any client crates.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::UserRole;
pub use types::*;
