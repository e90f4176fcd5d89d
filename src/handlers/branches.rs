// src/handlers/branches.rs

use axum::Json;

use crate::models::branch::{Branch, BRANCHES};

// GET /api/branches
#[utoipa::path(
    get,
    path = "/api/branches",
    tag = "Branches",
    responses(
        (status = 200, description = "Academy branches", body = Vec<Branch>)
    )
)]
pub async fn list_branches() -> Json<Vec<Branch>> {
    Json(BRANCHES.to_vec())
}
