// src/handlers/rbac.rs

use axum::{
    extract::Path,
    Json,
};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::rbac::{
        AccessSummary, Action, PermissionCheckPayload, PermissionCheckResponse, Resource,
        ResourceAccessResponse, Role, RoleDefaultsResponse, Scope,
    },
    services::rbac_service::{
        can_access_resource, default_permissions, has_permission, is_counselor, is_manager,
        is_team_lead,
    },
};

// GET /api/access/me
#[utoipa::path(
    get,
    path = "/api/access/me",
    tag = "Access",
    responses(
        (status = 200, description = "Role flags and effective permissions", body = AccessSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn my_access(AuthenticatedUser(user): AuthenticatedUser) -> Json<AccessSummary> {
    let current = Some(user.as_ref());
    Json(AccessSummary {
        role: user.role.to_string(),
        is_manager: is_manager(current),
        is_team_lead: is_team_lead(current),
        is_counselor: is_counselor(current),
        permissions: user.permissions.iter().cloned().collect(),
    })
}

// POST /api/access/check
#[utoipa::path(
    post,
    path = "/api/access/check",
    tag = "Access",
    request_body = PermissionCheckPayload,
    responses(
        (status = 200, description = "Decision of the permission evaluator", body = PermissionCheckResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn check_permission(
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PermissionCheckPayload>,
) -> Json<PermissionCheckResponse> {
    let current = Some(user.as_ref());
    let resource = payload.resource.parse::<Resource>();
    let action = payload.action.parse::<Action>();

    let allowed = match (resource, action) {
        (Ok(resource), Ok(action)) => match payload.scope.as_deref().map(str::parse::<Scope>) {
            None => has_permission(current, resource, action, None),
            Some(Ok(scope)) => has_permission(current, resource, action, Some(scope)),
            // Outside the known scopes only an `all` grant applies.
            Some(Err(_)) => has_permission(current, resource, action, Some(Scope::All)),
        },
        // Unknown resource or action names never match a grant.
        (resource, action) => {
            let reason = [resource.err(), action.err()]
                .into_iter()
                .flatten()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::debug!(user_id = %user.id, "Permission check denied: {}", reason);
            false
        }
    };

    Json(PermissionCheckResponse {
        resource: payload.resource,
        action: payload.action,
        scope: payload.scope,
        allowed,
    })
}

// GET /api/access/resources/{resource}
#[utoipa::path(
    get,
    path = "/api/access/resources/{resource}",
    tag = "Access",
    params(("resource" = String, Path, description = "Resource name, e.g. leads")),
    responses(
        (status = 200, description = "Whether any grant exists on the resource", body = ResourceAccessResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn check_resource(
    AuthenticatedUser(user): AuthenticatedUser,
    Path(resource): Path<String>,
) -> Json<ResourceAccessResponse> {
    let accessible = resource
        .parse::<Resource>()
        .is_ok_and(|r| can_access_resource(Some(user.as_ref()), r));

    Json(ResourceAccessResponse { resource, accessible })
}

// GET /api/roles/{role}/permissions
#[utoipa::path(
    get,
    path = "/api/roles/{role}/permissions",
    tag = "Access",
    params(("role" = String, Path, description = "manager, team_lead or counselor")),
    responses(
        (status = 200, description = "Default grants of the role", body = RoleDefaultsResponse),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn role_defaults(Path(role): Path<String>) -> Result<Json<RoleDefaultsResponse>, AppError> {
    let role = Role::from(role);
    if !role.is_known() {
        return Err(AppError::UnknownRole(role.to_string()));
    }

    let permissions = default_permissions(&role).iter().cloned().collect();
    Ok(Json(RoleDefaultsResponse { role: role.to_string(), permissions }))
}
