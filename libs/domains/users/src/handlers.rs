use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use axum_helpers::{AppError, CurrentUser, SessionStore, ValidatedJson};

use crate::error::UserResult;
use crate::models::{LoginRequest, LoginResponse, RegisterAdminRequest, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Shared state for the auth endpoints
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub sessions: SessionStore,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

/// Create the auth/users router
pub fn router<R: UserRepository + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/auth/register-admin", post(register_admin))
        .route("/auth/login", post(login))
        .route("/admin/users", get(list_admins))
        .with_state(state)
}

/// Register an admin account
///
/// POST /auth/register-admin
async fn register_admin<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterAdminRequest>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.register_admin(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive an opaque bearer token
///
/// POST /auth/login
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let user = state
        .service
        .verify_credentials(&input.username, &input.password)
        .await?;

    let token = state
        .sessions
        .issue(user.id, user.username.clone(), vec![user.role.to_string()])
        .await;

    Ok(Json(LoginResponse { token, user }))
}

/// List admin users
///
/// GET /admin/users (admin only)
async fn list_admins<R: UserRepository>(
    State(state): State<AuthState<R>>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    identity.require_admin()?;

    let admins = state.service.list_admins().await?;
    Ok(Json(admins))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        middleware::from_fn_with_state,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::repository::InMemoryUserRepository;
    use axum_helpers::identity_middleware;
    use core_config::auth::AuthConfig;

    fn test_app() -> Router {
        let auth_config = AuthConfig {
            admin_registration_key: "letmein".to_string(),
            session_ttl_secs: 3600,
        };
        let sessions = SessionStore::new(auth_config.session_ttl_secs);
        let state = AuthState {
            service: UserService::new(InMemoryUserRepository::new(), &auth_config),
            sessions: sessions.clone(),
        };
        router(state).layer(from_fn_with_state(sessions, identity_middleware))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_body(username: &str, key: &str) -> Value {
        json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "correct-horse-1",
            "registration_key": key,
        })
    }

    #[tokio::test]
    async fn register_admin_returns_created() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "/auth/register-admin",
                register_body("alice", "letmein"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["role"], "admin");
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn register_admin_with_bad_key_is_forbidden() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "/auth/register-admin",
                register_body("alice", "wrong"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn login_issues_a_working_token() {
        let app = test_app();

        app.clone()
            .oneshot(json_request(
                "/auth/register-admin",
                register_body("alice", "letmein"),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "/auth/login",
                json!({"username": "alice", "password": "correct-horse-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let token = body["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/users")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = test_app();

        app.clone()
            .oneshot(json_request(
                "/auth/register-admin",
                register_body("alice", "letmein"),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/auth/login",
                json!({"username": "alice", "password": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_admins_requires_authentication() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
