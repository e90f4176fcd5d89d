// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::CurrentSession,
    models::rbac::{Action, Resource, Scope},
    services::rbac_service::has_permission,
};

/// A permission a route requires, checked with the same evaluator the
/// `/api/access/check` endpoint exposes.
pub trait PermissionDef: Send + Sync + 'static {
    fn resource() -> Resource;
    fn action() -> Action;
    fn scope() -> Option<Scope> {
        None
    }
}

/// Rejects the request with 403 unless the session's user holds `T`.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;

        if !has_permission(Some(session.user.as_ref()), T::resource(), T::action(), T::scope()) {
            tracing::info!(
                user_id = %session.user.id,
                resource = %T::resource(),
                action = %T::action(),
                "Permission denied"
            );
            return Err(AppError::Forbidden(format!(
                "You need the '{}:{}' permission to perform this action.",
                T::resource(),
                T::action()
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// PERMISSIONS USED BY ROUTES
// ---

pub struct PermLeadsRead;
impl PermissionDef for PermLeadsRead {
    fn resource() -> Resource { Resource::Leads }
    fn action() -> Action { Action::Read }
}

pub struct PermUsersRead;
impl PermissionDef for PermUsersRead {
    fn resource() -> Resource { Resource::Users }
    fn action() -> Action { Action::Read }
}
