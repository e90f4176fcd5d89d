// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    branch::BranchCode,
    rbac::{Permission, PermissionPayload, PermissionSet, Role},
};

// User profile after hydration. Replaced wholesale on refresh, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "64f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,

    #[schema(value_type = String, example = "counselor")]
    pub role: Role,

    pub branch: BranchCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    // Counselors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_lead_id: Option<String>,

    // Team leads only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_members: Vec<String>,

    pub is_active: bool,

    #[schema(value_type = Vec<Permission>)]
    pub permissions: PermissionSet,

    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

/// Profile exactly as the CRM backend returns it from `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
    pub branch: BranchCode,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub team_lead_id: Option<String>,
    #[serde(default)]
    pub team_members: Option<Vec<String>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Option<Vec<PermissionPayload>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "The email address is invalid."))]
    #[schema(example = "counselor@dmhca.in")]
    pub email: String,
    #[validate(length(min = 6, message = "The password must have at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Claims of the gateway-issued JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // backend user id
    pub sid: Uuid,   // gateway session id
    pub exp: usize,
    pub iat: usize,
}
