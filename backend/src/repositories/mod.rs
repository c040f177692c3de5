//! Data access layer
//!
//! The authentication core only sees the [`UserRepository`] trait; the
//! concrete variant is chosen at startup and injected as
//! `Arc<dyn UserRepository>`.

pub mod memory;
pub mod user;

pub use memory::InMemoryUserRepository;
pub use user::{NewUser, PgUserRepository, RepositoryError, User, UserId, UserRepository};
