// src/models/rbac.rs

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::common::error::UnknownVariant;

// --- ROLES ---

/// The three role tiers. Anything else the backend sends is kept verbatim in
/// `Unknown` so lookups can fail closed instead of rejecting the profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Manager,
    TeamLead,
    Counselor,
    Unknown(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Manager => "manager",
            Role::TeamLead => "team_lead",
            Role::Counselor => "counselor",
            Role::Unknown(other) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown(_))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "manager" => Role::Manager,
            "team_lead" => Role::TeamLead,
            "counselor" => Role::Counselor,
            _ => Role::Unknown(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- RESOURCES / ACTIONS / SCOPES ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Leads,
    Analytics,
    Sales,
    Communications,
    Users,
    Settings,
    Hospitals,
    Courses,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Leads,
        Resource::Analytics,
        Resource::Sales,
        Resource::Communications,
        Resource::Users,
        Resource::Settings,
        Resource::Hospitals,
        Resource::Courses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Leads => "leads",
            Resource::Analytics => "analytics",
            Resource::Sales => "sales",
            Resource::Communications => "communications",
            Resource::Users => "users",
            Resource::Settings => "settings",
            Resource::Hospitals => "hospitals",
            Resource::Courses => "courses",
        }
    }
}

impl FromStr for Resource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("resource", s))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    // Implies every other action on the resource.
    Manage,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }
}

impl FromStr for Action {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "manage" => Ok(Action::Manage),
            other => Err(UnknownVariant::new("action", other)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breadth of a grant: `all` (cross-branch), `team` (own team within the
/// branch) or `own` (self-assigned records only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    All,
    Team,
    Own,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Team => "team",
            Scope::Own => "own",
        }
    }
}

impl FromStr for Scope {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Scope::All),
            "team" => Ok(Scope::Team),
            "own" => Ok(Scope::Own),
            other => Err(UnknownVariant::new("scope", other)),
        }
    }
}

// --- PERMISSIONS ---

/// One grant on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = "leads")]
    pub resource: Resource,

    #[schema(example = json!(["create", "read", "update"]))]
    pub actions: BTreeSet<Action>,

    // `None` only matches calls that do not ask for a scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "own")]
    pub scope: Option<Scope>,
}

impl Permission {
    pub fn new(resource: Resource, actions: &[Action], scope: Scope) -> Self {
        Self {
            resource,
            actions: actions.iter().copied().collect(),
            scope: Some(scope),
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action) || self.actions.contains(&Action::Manage)
    }
}

/// Ordered permission list holding at most one entry per resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(Vec<Permission>);

impl PermissionSet {
    /// Builds the set keeping the first entry of each resource. The entries
    /// that lost are handed back so the caller can report them.
    pub fn from_entries(entries: impl IntoIterator<Item = Permission>) -> (Self, Vec<Permission>) {
        let mut kept: Vec<Permission> = Vec::new();
        let mut dropped = Vec::new();
        for entry in entries {
            if kept.iter().any(|p| p.resource == entry.resource) {
                dropped.push(entry);
            } else {
                kept.push(entry);
            }
        }
        (Self(kept), dropped)
    }

    pub fn get(&self, resource: Resource) -> Option<&Permission> {
        self.0.iter().find(|p| p.resource == resource)
    }

    pub fn contains(&self, resource: Resource) -> bool {
        self.get(resource).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

/// Permission entry as the backend sends it, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPayload {
    pub resource: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

// --- ACCESS CHECK PAYLOADS ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckPayload {
    #[schema(example = "leads")]
    pub resource: String,

    #[schema(example = "update")]
    pub action: String,

    #[schema(example = "own")]
    pub scope: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckResponse {
    pub resource: String,
    pub action: String,
    pub scope: Option<String>,
    pub allowed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAccessResponse {
    pub resource: String,
    pub accessible: bool,
}

/// Role flags plus the effective permission list of the caller.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessSummary {
    #[schema(example = "team_lead")]
    pub role: String,
    pub is_manager: bool,
    pub is_team_lead: bool,
    pub is_counselor: bool,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefaultsResponse {
    #[schema(example = "counselor")]
    pub role: String,
    pub permissions: Vec<Permission>,
}
