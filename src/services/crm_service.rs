// src/services/crm_service.rs

use std::sync::Arc;

use crate::{
    backend::CrmBackend,
    common::error::AppError,
    models::{
        auth::User,
        lead::{Lead, LeadPage, LeadQuery},
    },
    services::{
        rbac_service::hydrate_user,
        session::Session,
        team_service::{verify_team_links, TeamLinkViolation},
        visibility::{get_accessible_leads, get_accessible_users},
    },
};

/// Reads from the CRM backend, narrowed to what the session's user may see.
#[derive(Clone)]
pub struct CrmService {
    backend: Arc<dyn CrmBackend>,
}

impl CrmService {
    pub fn new(backend: Arc<dyn CrmBackend>) -> Self {
        Self { backend }
    }

    pub async fn list_visible_leads(&self, session: &Session, query: &LeadQuery) -> Result<LeadPage, AppError> {
        let page = self.backend.list_leads(&session.backend_token, query).await?;
        let fetched = page.data.len();
        let data = get_accessible_leads(Some(session.user.as_ref()), &page.data);

        if data.len() < fetched {
            tracing::debug!(
                user_id = %session.user.id,
                fetched,
                visible = data.len(),
                "Leads hidden by visibility rules"
            );
        }

        Ok(LeadPage { data, pagination: page.pagination })
    }

    /// Narrows a snapshot the caller already holds. No backend call.
    pub fn filter_snapshot(&self, session: &Session, leads: &[Lead]) -> Vec<Lead> {
        get_accessible_leads(Some(session.user.as_ref()), leads)
    }

    pub async fn list_visible_users(&self, session: &Session) -> Result<(Vec<User>, Vec<TeamLinkViolation>), AppError> {
        // A. Full directory, hydrated like any session profile
        let users: Vec<User> = self
            .backend
            .list_users(&session.backend_token)
            .await?
            .into_iter()
            .map(hydrate_user)
            .collect();

        // B. Link check runs on the whole directory, before narrowing
        let violations = verify_team_links(&users);
        for violation in &violations {
            tracing::warn!(?violation, "Inconsistent team link in user directory");
        }

        // C. Narrowed to what the caller may see
        Ok((get_accessible_users(Some(session.user.as_ref()), &users), violations))
    }
}
