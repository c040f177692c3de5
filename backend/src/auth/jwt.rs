//! JWT token generation and validation
//!
//! Provides access and refresh token management with pre-computed keys
//! for optimal performance.
//!
//! Wire format (HS256 only):
//! - access:  `{sub, iat, exp, iss, jti}`
//! - refresh: `{sub, iat, exp, iss, type: "refresh"}`

use crate::config::SecurityConfig;
use crate::repositories::User;
use anyhow::{bail, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use storefront_shared::TokenPair;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Value of the `type` claim carried by refresh tokens
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims of an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Random token ID
    pub jti: String,
}

/// Claims of a refresh token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Claims read back from a verified token of either kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenClaims {
    /// Refresh tokens are recognised solely by their `type` claim
    pub fn is_refresh(&self) -> bool {
        self.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE)
    }
}

/// Why a token was rejected
///
/// `Expired` is only reported for tokens whose signature and issuer check
/// out; everything else collapses into `Invalid`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

/// Source of the current time, in Unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for tests and replay tooling
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we build them once at startup
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Token codec: issues and verifies signed access/refresh tokens
///
/// Cheap to clone; keys and clock are shared behind `Arc`. Safe to use
/// from any number of tasks concurrently.
#[derive(Clone)]
pub struct TokenCodec {
    keys: JwtKeys,
    issuer: String,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec with pre-computed keys
    ///
    /// # Errors
    /// Fails on an empty secret or issuer; the process must not start
    /// without a usable signing key.
    pub fn new(
        secret: &str,
        issuer: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Result<Self> {
        if secret.is_empty() {
            bail!("JWT signing key must not be empty");
        }
        if issuer.is_empty() {
            bail!("JWT issuer must not be empty");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Expiry is checked against our own clock after the issuer check
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            keys: JwtKeys::new(secret),
            issuer: issuer.to_string(),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    /// Build from the security section of the application config
    pub fn from_config(config: &SecurityConfig) -> Result<Self> {
        Self::new(
            config.jwt_secret_key.expose_secret(),
            &config.jwt_issuer,
            config.jwt_access_token_expire_secs,
            config.refresh_token_expire_secs,
        )
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a fresh access/refresh pair for a user
    pub fn issue(&self, user: &User) -> Result<TokenPair> {
        let now = self.clock.now();
        let sub = user.id.to_string();
        let access_exp = expiry(now, self.access_token_expiry_secs)?;
        let refresh_exp = expiry(now, self.refresh_token_expiry_secs)?;

        let access = AccessClaims {
            sub: sub.clone(),
            iat: now,
            exp: access_exp,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().simple().to_string(),
        };
        let refresh = RefreshClaims {
            sub,
            iat: now,
            exp: refresh_exp,
            iss: self.issuer.clone(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
        };

        Ok(TokenPair {
            access_token: self.encode(&access)?,
            refresh_token: self.encode(&refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry_secs,
        })
    }

    /// Sign an arbitrary claim set with this codec's key
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Verify a token and return its claims
    ///
    /// Signature, algorithm, required claims and issuer are checked first;
    /// only a token passing all of those can be reported as `Expired`.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenValidationError> {
        let claims = decode::<TokenClaims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| {
                debug!(reason = %e, "Token rejected");
                TokenValidationError::Invalid
            })?
            .claims;

        if self.clock.now() >= claims.exp {
            debug!(sub = %claims.sub, exp = claims.exp, "Token expired");
            return Err(TokenValidationError::Expired);
        }

        Ok(claims)
    }

    /// Whether a token currently decodes successfully
    #[inline]
    pub fn is_valid(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }

    /// Get access token expiry in seconds
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }

    #[inline]
    pub fn refresh_token_expiry_secs(&self) -> i64 {
        self.refresh_token_expiry_secs
    }

    #[inline]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Current time according to this codec's clock
    #[inline]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }
}

fn expiry(now: i64, ttl_secs: i64) -> Result<i64> {
    now.checked_add(ttl_secs)
        .ok_or_else(|| anyhow::anyhow!("Token lifetime of {}s overflows the clock", ttl_secs))
}
