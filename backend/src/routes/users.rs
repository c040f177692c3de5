//! User routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use storefront_shared::UserProfile;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// Get the profile of the authenticated user
///
/// GET /api/v1/users/me
///
/// # Authentication
/// Requires a valid access token in the Authorization header. The
/// extractor has already loaded the user.
async fn get_current_user(auth_user: AuthUser) -> ApiResult<Json<UserProfile>> {
    Ok(Json(auth_user.user.into()))
}
