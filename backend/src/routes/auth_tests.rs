//! Property-based tests for authentication enforcement
//!
//! Requests to protected endpoints without a usable access token return 401.

#[cfg(test)]
mod tests {
    use crate::auth::TokenCodec;
    use crate::config::AppConfig;
    use crate::repositories::{InMemoryUserRepository, NewUser, UserRepository};
    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use proptest::prelude::*;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Create a test app state over an empty in-memory store
    fn create_test_state() -> (AppState, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let state = AppState::new(users.clone(), None, AppConfig::default()).unwrap();
        (state, users)
    }

    async fn seed_user(users: &InMemoryUserRepository) -> crate::repositories::User {
        users
            .create(NewUser {
                email: "shopper@example.com".to_string(),
                password_hash: "$2b$04$unused".to_string(),
                full_name: Some("Sam Shopper".to_string()),
            })
            .await
            .unwrap()
    }

    async fn get_me(state: AppState, auth_header: Option<String>) -> StatusCode {
        let app = create_router(state);

        let mut request_builder = Request::builder().uri("/api/v1/users/me").method("GET");
        if let Some(header) = auth_header {
            request_builder = request_builder.header("Authorization", header);
        }

        let request = request_builder.body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    /// Generate random invalid tokens
    fn invalid_token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            // Empty token
            Just("".to_string()),
            // Random string (not a valid JWT)
            "[a-zA-Z0-9]{10,50}",
            // Malformed JWT (wrong number of parts)
            "[a-zA-Z0-9]{10}\\.[a-zA-Z0-9]{10}",
            // Valid format but invalid signature
            "[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}",
        ]
    }

    /// Generate random authorization header formats
    fn auth_header_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            // No header
            Just(None),
            // Missing Bearer prefix
            invalid_token_strategy().prop_map(Some),
            // Wrong prefix
            invalid_token_strategy().prop_map(|t| Some(format!("Basic {}", t))),
            // Bearer with invalid token
            invalid_token_strategy().prop_map(|t| Some(format!("Bearer {}", t))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: Unauthenticated requests to protected endpoints return 401
        #[test]
        fn prop_unauthenticated_requests_return_401(
            auth_header in auth_header_strategy()
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let (state, _users) = create_test_state();
                let status = get_me(state, auth_header).await;

                prop_assert_eq!(
                    status,
                    StatusCode::UNAUTHORIZED,
                    "Expected 401 for unauthenticated request"
                );

                Ok(())
            })?;
        }
    }

    #[tokio::test]
    async fn test_missing_auth_header_returns_401() {
        let (state, _users) = create_test_state();
        assert_eq!(get_me(state, None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_auth_scheme_returns_401() {
        let (state, _users) = create_test_state();
        let status = get_me(state, Some("Basic dXNlcjpwYXNz".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_with_wrong_secret_returns_401() {
        let (state, users) = create_test_state();
        let user = seed_user(&users).await;

        // Same issuer, DIFFERENT secret
        let foreign = TokenCodec::new(
            "wrong-secret-key",
            state.auth().tokens().issuer(),
            900,
            604800,
        )
        .unwrap();
        let token = foreign.issue(&user).unwrap().access_token;

        let status = get_me(state, Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_token_rejected_on_protected_route() {
        let (state, users) = create_test_state();
        let user = seed_user(&users).await;
        let pair = state.auth().tokens().issue(&user).unwrap();

        let status = get_me(state, Some(format!("Bearer {}", pair.refresh_token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_passes_auth() {
        let (state, users) = create_test_state();
        let user = seed_user(&users).await;
        let pair = state.auth().tokens().issue(&user).unwrap();

        let status = get_me(state, Some(format!("Bearer {}", pair.access_token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_valid_token_for_deleted_user_returns_404() {
        let (state, users) = create_test_state();
        let user = seed_user(&users).await;
        let pair = state.auth().tokens().issue(&user).unwrap();
        assert!(users.remove(user.id).await);

        let status = get_me(state, Some(format!("Bearer {}", pair.access_token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
