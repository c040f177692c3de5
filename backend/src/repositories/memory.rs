//! In-memory user repository
//!
//! Used by the test suites and for running the service without a
//! database. The uniqueness check and the insert happen under one write
//! lock, so concurrent registrations of the same email cannot both win.

use super::user::{NewUser, RepositoryError, User, UserId, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use storefront_shared::validation::email_key;
use storefront_shared::UserRole;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    /// email key -> user id
    by_email: HashMap<String, UserId>,
    last_id: UserId,
}

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the active flag of an account; returns `false` if absent
    pub async fn set_active(&self, id: UserId, is_active: bool) -> bool {
        let mut store = self.store.write().await;
        match store.users.get_mut(&id) {
            Some(user) => {
                user.is_active = is_active;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Remove an account; returns `false` if absent
    pub async fn remove(&self, id: UserId) -> bool {
        let mut store = self.store.write().await;
        match store.users.remove(&id) {
            Some(user) => {
                store.by_email.remove(&email_key(&user.email));
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .by_email
            .get(&email_key(email))
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut store = self.store.write().await;

        let key = email_key(&new_user.email);
        if store.by_email.contains_key(&key) {
            return Err(RepositoryError::EmailTaken);
        }

        store.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: store.last_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            is_active: true,
            roles: vec![UserRole::Customer],
            created_at: now,
            updated_at: now,
        };

        store.by_email.insert(key, user.id);
        store.users.insert(user.id, user.clone());
        debug!(user_id = user.id, "User stored in memory");

        Ok(user)
    }
}
