//! Password hashing using bcrypt
//!
//! Provides salted, cost-parameterised hashing and constant-time
//! verification.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. Async callers use the `*_async`
//! variants, which run on the blocking thread pool.

use anyhow::{bail, Result};
use storefront_shared::validation::MAX_PASSWORD_BYTES;

/// Password hashing service
///
/// Every hash embeds a fresh random salt and the configured work factor,
/// so the same password never hashes to the same string twice.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt work factor (4..=31)
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password (blocking operation)
    ///
    /// # Performance Note
    /// This is CPU-intensive. For async contexts, use `hash_async`.
    ///
    /// bcrypt only reads the first 72 bytes, so longer input is refused
    /// instead of being silently truncated.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            bail!("Password exceeds {} bytes", MAX_PASSWORD_BYTES);
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A malformed hash verifies as `false` rather than failing, so a
    /// corrupted row is indistinguishable from a wrong password. Input
    /// longer than 72 bytes never matches, since no stored hash covers it.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(&self, password: String, hash: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}
