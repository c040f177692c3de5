//! Authentication service
//!
//! Stateless orchestration of login, registration, token refresh and
//! current-user resolution. A session exists only as the token pair
//! handed back to the caller; nothing is stored server-side.
//!
//! # Performance
//!
//! - Password hashing/verification runs on the blocking thread pool
//! - Token work uses the codec's pre-computed keys

use crate::auth::{AuthError, PasswordHasher, TokenCodec};
use crate::config::SecurityConfig;
use crate::repositories::{NewUser, RepositoryError, User, UserId, UserRepository};
use std::sync::Arc;
use storefront_shared::validation::{normalize_email, validate_email, validate_password};
use storefront_shared::{TokenPair, UserProfile};
use tracing::{debug, info, warn};

/// Authentication service
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, tokens: TokenCodec) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Build the hasher and codec from configuration
    ///
    /// # Errors
    /// Fails when the signing key or issuer is unusable.
    pub fn from_config(
        users: Arc<dyn UserRepository>,
        config: &SecurityConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self::new(
            users,
            PasswordHasher::new(config.password_hash_cost),
            TokenCodec::from_config(config)?,
        ))
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Exchange credentials for a token pair
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.users.get_by_email(email).await? {
            Some(user) => user,
            None => {
                debug!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let valid = self
            .hasher
            .verify_async(password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            debug!(user_id = user.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = user.id, "Login rejected: account inactive");
            return Err(AuthError::AccountInactive);
        }

        let pair = self.tokens.issue(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok(pair)
    }

    /// Create a customer account and return its public profile
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        validate_email(email)?;
        validate_password(password)?;
        let email = normalize_email(email);

        if self.users.get_by_email(&email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = self.hasher.hash_async(password.to_string()).await?;

        let new_user = NewUser {
            email,
            password_hash,
            full_name: full_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };

        // A concurrent registration may have won the race since the lookup
        let user = self.users.create(new_user).await.map_err(|e| match e {
            RepositoryError::EmailTaken => AuthError::EmailAlreadyRegistered,
            other => AuthError::Repository(other),
        })?;

        info!(user_id = user.id, "User registered");
        Ok(user.into())
    }

    /// Trade a refresh token for a brand new pair
    ///
    /// The presented token stays valid until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .tokens
            .decode(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;
        let user_id = parse_subject(&claims.sub)?;

        let user = match self.users.get_by_id(user_id).await? {
            Some(user) if user.is_active => user,
            _ => {
                debug!(user_id, "Refresh rejected: user missing or inactive");
                return Err(AuthError::InvalidToken);
            }
        };

        let pair = self.tokens.issue(&user)?;
        debug!(user_id = user.id, "Token pair refreshed");
        Ok(pair)
    }

    /// Resolve the user behind an access token
    ///
    /// The account's active flag is not re-checked here; a deactivated
    /// user keeps access until the access token expires.
    pub async fn resolve_current_user(&self, access_token: &str) -> Result<User, AuthError> {
        let claims = self
            .tokens
            .decode(access_token)
            .map_err(|_| AuthError::InvalidToken)?;
        let user_id = parse_subject(&claims.sub)?;

        if claims.is_refresh() {
            debug!(user_id, "Refresh token presented as access token");
            return Err(AuthError::WrongTokenType);
        }

        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Public profile of a user
    pub async fn get_user_profile(&self, user_id: UserId) -> Result<UserProfile, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or(AuthError::UserNotFound)
    }
}

fn parse_subject(sub: &str) -> Result<UserId, AuthError> {
    sub.parse::<UserId>().map_err(|_| AuthError::InvalidToken)
}
