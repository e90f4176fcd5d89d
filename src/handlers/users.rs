// src/handlers/users.rs

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentSession,
        rbac::{PermUsersRead, RequirePermission},
    },
    models::auth::User,
    services::{rbac_service::is_manager, team_service::TeamLinkViolation},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDirectoryResponse {
    pub data: Vec<User>,
    // Only reported to managers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_violations: Vec<TeamLinkViolation>,
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "User directory narrowed to the caller's team", body = UserDirectoryResponse),
        (status = 403, description = "No users:read grant")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermUsersRead>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<UserDirectoryResponse>, AppError> {
    let result = app_state.crm_service.list_visible_users(&session).await;
    let (data, violations) = app_state.auth_service.guard_expiry(&session, result).await?;

    let link_violations = if is_manager(Some(session.user.as_ref())) {
        violations
    } else {
        Vec::new()
    };

    Ok(Json(UserDirectoryResponse { data, link_violations }))
}
