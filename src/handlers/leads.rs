// src/handlers/leads.rs

use axum::{extract::State, Json};
use axum_extra::extract::Query;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentSession,
        rbac::{PermLeadsRead, RequirePermission},
    },
    models::lead::{Lead, LeadPage, LeadQuery, LeadSnapshotPayload},
};

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(LeadQuery),
    responses(
        (status = 200, description = "Backend lead page narrowed to the caller's visibility", body = LeadPage),
        (status = 401, description = "Not authenticated or backend session expired"),
        (status = 403, description = "No leads:read grant"),
        (status = 502, description = "Backend error")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermLeadsRead>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<LeadQuery>,
) -> Result<Json<LeadPage>, AppError> {
    let result = app_state.crm_service.list_visible_leads(&session, &query).await;
    let page = app_state.auth_service.guard_expiry(&session, result).await?;
    Ok(Json(page))
}

// POST /api/leads/visible
#[utoipa::path(
    post,
    path = "/api/leads/visible",
    tag = "Leads",
    request_body = LeadSnapshotPayload,
    responses(
        (status = 200, description = "The visible subset of the snapshot, in order", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn filter_visible_leads(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<LeadSnapshotPayload>,
) -> Json<Vec<Lead>> {
    Json(app_state.crm_service.filter_snapshot(&session, &payload.leads))
}
