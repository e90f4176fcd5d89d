// src/services/auth.rs

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    backend::CrmBackend,
    common::error::AppError,
    models::auth::{Claims, User},
    services::{
        rbac_service::hydrate_user,
        session::{Session, SessionState, SessionStore},
    },
};

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn CrmBackend>,
    sessions: SessionStore,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(backend: Arc<dyn CrmBackend>, sessions: SessionStore, jwt_secret: String) -> Self {
        Self { backend, sessions, jwt_secret }
    }

    /// Credential exchange with the backend. On success the profile is
    /// hydrated, a session is opened and a gateway token is returned for it.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        // A. Credential exchange
        let login = self.backend.login(email, password).await?;

        // B. Hydration, once per session
        let user = hydrate_user(login.user);
        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login refused for inactive account");
            return Err(AppError::InvalidCredentials);
        }

        // C. Session + gateway token sharing the same expiry
        let session = Session::new(user.clone(), login.token);
        let token = self.create_token(&user.id, &session)?;
        tracing::info!(user_id = %user.id, role = %user.role, session_id = %session.id, "Session opened");
        self.sessions.insert(session).await;

        Ok((token, user))
    }

    /// Resolves a gateway token to its live session.
    pub async fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        match self.sessions.get(token_data.claims.sid).await {
            SessionState::Authenticated(session) if session.user.id == token_data.claims.sub => Ok(session),
            _ => Err(AppError::InvalidToken),
        }
    }

    /// Logs out at the backend (best effort) and always drops the session.
    pub async fn logout_user(&self, session: &Session) {
        if let Err(e) = self.backend.logout(&session.backend_token).await {
            tracing::warn!(session_id = %session.id, "Backend logout failed: {}", e);
        }
        self.sessions.remove(session.id).await;
        let minutes = (Utc::now() - session.started_at).num_minutes();
        tracing::info!(user_id = %session.user.id, session_id = %session.id, minutes, "Session closed");
    }

    /// Re-reads the profile and replaces the session wholesale. Any failure,
    /// or an account deactivated in the meantime, ends the session.
    pub async fn refresh_user(&self, session: &Session) -> Result<User, AppError> {
        // A. Fresh profile from the backend
        let payload = match self.backend.current_user(&session.backend_token).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(session_id = %session.id, "Profile refresh failed, closing session: {}", e);
                self.sessions.remove(session.id).await;
                return Err(e);
            }
        };

        // B. Same admission rule as login
        let user = hydrate_user(payload);
        if !user.is_active {
            tracing::warn!(user_id = %user.id, session_id = %session.id, "Account deactivated, closing session");
            self.sessions.remove(session.id).await;
            return Err(AppError::InvalidCredentials);
        }

        // C. Wholesale swap; a concurrent logout wins
        if !self.sessions.replace(session.with_user(user.clone())).await {
            return Err(AppError::InvalidToken);
        }
        Ok(user)
    }

    /// Passes `result` through, ending the session first when the backend
    /// reported that its authentication expired.
    pub async fn guard_expiry<T>(&self, session: &Session, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(AppError::AuthenticationExpired) = &result {
            tracing::info!(session_id = %session.id, "Backend session expired, closing session");
            self.sessions.remove(session.id).await;
        }
        result
    }

    fn create_token(&self, user_id: &str, session: &Session) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            sid: session.id,
            exp: session.expires_at.timestamp() as usize,
            iat: session.started_at.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
