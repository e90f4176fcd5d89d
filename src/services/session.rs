// src/services/session.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::auth::User;

/// Lifetime of a session and of the gateway token issued for it.
pub const SESSION_TTL_DAYS: i64 = 7;

/// One authenticated login. Never mutated in place: refreshing the profile
/// swaps in a new `Session` value.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user: Arc<User>,
    pub backend_token: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User, backend_token: String) -> Self {
        let started_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user: Arc::new(user),
            backend_token,
            started_at,
            expires_at: started_at + Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Same session, new profile.
    pub fn with_user(&self, user: User) -> Self {
        Self {
            user: Arc::new(user),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Anonymous,
    Authenticated(Session),
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session, purging every expired one on the way.
    pub async fn insert(&self, session: Session) {
        let mut sessions = self.inner.write().await;
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        if sessions.len() < before {
            tracing::debug!(purged = before - sessions.len(), "Expired sessions purged");
        }
        sessions.insert(session.id, session);
    }

    /// An expired session reads as `Anonymous` and is dropped.
    pub async fn get(&self, id: Uuid) -> SessionState {
        let now = Utc::now();
        {
            let sessions = self.inner.read().await;
            match sessions.get(&id) {
                Some(session) if !session.is_expired(now) => {
                    return SessionState::Authenticated(session.clone());
                }
                Some(_) => {}
                None => return SessionState::Anonymous,
            }
        }

        self.inner.write().await.remove(&id);
        SessionState::Anonymous
    }

    /// Swaps the stored session for `session` if it is still live. Returns
    /// false when the session was logged out in the meantime.
    pub async fn replace(&self, session: Session) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&session.id) {
            Some(slot) => {
                *slot = session;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: Uuid) -> Option<Session> {
        self.inner.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
