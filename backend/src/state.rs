//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys are derived once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::config::AppConfig;
use crate::repositories::UserRepository;
use crate::services::AuthService;
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database pool, absent when running on the in-memory repository
    pub db: Option<PgPool>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Authentication service with pre-computed JWT keys
    pub auth: AuthService,
}

impl AppState {
    /// Create a new application state
    ///
    /// # Errors
    /// Fails when the signing configuration is unusable; the process must
    /// not start in that case.
    pub fn new(
        users: Arc<dyn UserRepository>,
        db: Option<PgPool>,
        config: AppConfig,
    ) -> Result<Self> {
        config.security.validate()?;
        let auth = AuthService::from_config(users, &config.security)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            auth,
        })
    }

    /// Build state around an already assembled service
    pub fn with_service(auth: AuthService, db: Option<PgPool>, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
            auth,
        }
    }

    /// Get a reference to the database pool, if any
    #[inline]
    pub fn db(&self) -> Option<&PgPool> {
        self.db.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the authentication service
    #[inline]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}
