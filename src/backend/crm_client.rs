// src/backend/crm_client.rs

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    common::error::AppError,
    models::{
        auth::UserPayload,
        lead::{LeadPage, LeadQuery},
    },
};

/// Result of the credential exchange with the CRM backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendLogin {
    pub token: String,
    pub user: UserPayload,
}

/// The CRM REST backend. Every call except `login` carries the backend bearer
/// token of the session; a 401 surfaces as `AppError::AuthenticationExpired`.
#[async_trait]
pub trait CrmBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<BackendLogin, AppError>;

    async fn logout(&self, token: &str) -> Result<(), AppError>;

    async fn current_user(&self, token: &str) -> Result<UserPayload, AppError>;

    async fn list_leads(&self, token: &str, query: &LeadQuery) -> Result<LeadPage, AppError>;

    async fn list_users(&self, token: &str) -> Result<Vec<UserPayload>, AppError>;
}
