// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::refresh,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,

        // --- Access ---
        handlers::rbac::my_access,
        handlers::rbac::check_permission,
        handlers::rbac::check_resource,
        handlers::rbac::role_defaults,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::filter_visible_leads,

        // --- Branches ---
        handlers::branches::list_branches,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Access ---
            models::rbac::Resource,
            models::rbac::Action,
            models::rbac::Scope,
            models::rbac::Permission,
            models::rbac::PermissionCheckPayload,
            models::rbac::PermissionCheckResponse,
            models::rbac::ResourceAccessResponse,
            models::rbac::AccessSummary,
            models::rbac::RoleDefaultsResponse,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Qualification,
            models::lead::Note,
            models::lead::Lead,
            models::lead::Pagination,
            models::lead::LeadPage,
            models::lead::LeadSnapshotPayload,

            // --- Branches ---
            models::branch::BranchCode,
            models::branch::Branch,

            // --- Directory ---
            handlers::users::UserDirectoryResponse,
            services::team_service::TeamLinkViolation,
        )
    ),
    tags(
        (name = "Auth", description = "Login, logout and session refresh"),
        (name = "Users", description = "Current user and team directory"),
        (name = "Access", description = "Permission evaluator and role defaults"),
        (name = "Leads", description = "Lead lists narrowed by visibility"),
        (name = "Branches", description = "Academy branches")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
