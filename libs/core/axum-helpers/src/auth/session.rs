use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Identity;

#[derive(Debug, Clone)]
struct Session {
    user_id: Uuid,
    username: String,
    roles: Vec<String>,
    expires_at: DateTime<Utc>,
}

/// In-memory bearer-token session store.
///
/// Tokens are 32 random bytes, hex-encoded. Expired sessions are
/// dropped lazily on lookup.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Issues a fresh token for the given user and returns it.
    pub async fn issue(&self, user_id: Uuid, username: String, roles: Vec<String>) -> String {
        let token = generate_token();
        let session = Session {
            user_id,
            username,
            roles,
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Resolves a token to an identity, dropping the session if it has
    /// expired.
    pub async fn resolve(&self, token: &str) -> Option<Identity> {
        {
            let sessions = self.sessions.read().await;
            let session = sessions.get(token)?;
            if session.expires_at > Utc::now() {
                return Some(Identity::authenticated(
                    session.user_id,
                    session.username.clone(),
                    session.roles.clone(),
                ));
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    /// Removes a session. Returns whether a session existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ADMIN_ROLE;

    #[tokio::test]
    async fn issued_token_resolves_to_identity() {
        let store = SessionStore::new(3600);
        let user_id = Uuid::new_v4();
        let token = store
            .issue(user_id, "admin".to_string(), vec![ADMIN_ROLE.to_string()])
            .await;

        let identity = store.resolve(&token).await.unwrap();
        assert_eq!(identity.user_id, Some(user_id));
        assert_eq!(identity.username.as_deref(), Some("admin"));
        assert!(identity.is_admin());
    }

    #[tokio::test]
    async fn unknown_token_does_not_resolve() {
        let store = SessionStore::new(3600);
        assert!(store.resolve("deadbeef").await.is_none());
    }

    #[tokio::test]
    async fn expired_session_is_dropped() {
        let store = SessionStore::new(0);
        let token = store
            .issue(Uuid::new_v4(), "admin".to_string(), vec![])
            .await;
        assert!(store.resolve(&token).await.is_none());
        // lazily removed, so revoking again finds nothing
        assert!(!store.revoke(&token).await);
    }

    #[tokio::test]
    async fn revoked_token_does_not_resolve() {
        let store = SessionStore::new(3600);
        let token = store
            .issue(Uuid::new_v4(), "admin".to_string(), vec![])
            .await;
        assert!(store.revoke(&token).await);
        assert!(store.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let store = SessionStore::new(3600);
        let user_id = Uuid::new_v4();
        let a = store.issue(user_id, "a".to_string(), vec![]).await;
        let b = store.issue(user_id, "a".to_string(), vec![]).await;
        assert_ne!(a, b);
    }
}
