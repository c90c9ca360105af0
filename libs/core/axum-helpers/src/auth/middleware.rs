use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::{Identity, SessionStore};

/// Resolves the bearer token (if any) against the session store and
/// inserts the resulting [`Identity`] into the request extensions.
///
/// Never rejects: missing, malformed, or stale tokens yield an
/// anonymous identity, and per-route guards decide what to do with it.
pub async fn identity_middleware(
    State(sessions): State<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match bearer_token(&request) {
        Some(token) => match sessions.resolve(&token).await {
            Some(identity) => identity,
            None => {
                debug!("Bearer token did not resolve to a session");
                Identity::anonymous()
            }
        },
        None => Identity::anonymous(),
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::{CurrentUser, ADMIN_ROLE};

    async fn whoami(CurrentUser(identity): CurrentUser) -> String {
        identity
            .username
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(sessions: SessionStore) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(sessions, identity_middleware))
    }

    #[tokio::test]
    async fn request_without_token_is_anonymous() {
        let app = app(SessionStore::new(3600));
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"anonymous");
    }

    #[tokio::test]
    async fn valid_token_resolves_to_username() {
        let sessions = SessionStore::new(3600);
        let token = sessions
            .issue(
                Uuid::new_v4(),
                "alice".to_string(),
                vec![ADMIN_ROLE.to_string()],
            )
            .await;

        let response = app(sessions)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    async fn stale_token_falls_back_to_anonymous() {
        let sessions = SessionStore::new(0);
        let token = sessions
            .issue(Uuid::new_v4(), "alice".to_string(), vec![])
            .await;

        let response = app(sessions)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"anonymous");
    }
}
