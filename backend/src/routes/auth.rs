//! Authentication routes
//!
//! Provides endpoints for user registration, login, and token refresh.
//!
//! Password hashing and verification run on the blocking thread pool
//! inside [`AuthService`](crate::services::AuthService).

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use storefront_shared::{LoginRequest, RefreshRequest, RegisterRequest, TokenPair, UserProfile};
use validator::Validate;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
}

/// Register a new user
///
/// POST /api/v1/users/auth/register
///
/// Returns the created profile; the caller logs in separately.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    req.validate()?;

    let profile = state
        .auth()
        .register(&req.email, &req.password, req.full_name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Login with email and password
///
/// POST /api/v1/users/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let tokens = state.auth().login(&req.email, &req.password).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new pair
///
/// POST /api/v1/users/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let tokens = state.auth().refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}
