// src/services/rbac_service.rs

use crate::models::{
    auth::{User, UserPayload},
    rbac::{Action, Permission, PermissionPayload, PermissionSet, Resource, Role, Scope},
};

use Action::{Create, Delete, Manage, Read, Update};

// =============================================================================
//  DEFAULT GRANTS PER ROLE
// =============================================================================

/// Grants used to backfill a profile that arrives without explicit
/// permissions. Unknown roles get nothing.
pub fn default_permissions(role: &Role) -> PermissionSet {
    let entries = match role {
        Role::Manager => vec![
            Permission::new(Resource::Leads, &[Create, Read, Update, Delete, Manage], Scope::All),
            Permission::new(Resource::Analytics, &[Read], Scope::All),
            Permission::new(Resource::Sales, &[Read, Manage], Scope::All),
            Permission::new(Resource::Communications, &[Create, Read, Update, Delete], Scope::All),
            Permission::new(Resource::Users, &[Create, Read, Update, Delete, Manage], Scope::All),
            Permission::new(Resource::Settings, &[Read, Update, Manage], Scope::All),
            Permission::new(Resource::Hospitals, &[Read, Update], Scope::All),
            Permission::new(Resource::Courses, &[Read, Update], Scope::All),
        ],
        Role::TeamLead => vec![
            Permission::new(Resource::Leads, &[Create, Read, Update, Delete], Scope::Team),
            Permission::new(Resource::Analytics, &[Read], Scope::Team),
            Permission::new(Resource::Sales, &[Read], Scope::Team),
            Permission::new(Resource::Communications, &[Create, Read, Update], Scope::Team),
            Permission::new(Resource::Users, &[Read], Scope::Team),
            Permission::new(Resource::Settings, &[Read], Scope::Own),
            Permission::new(Resource::Hospitals, &[Read], Scope::All),
            Permission::new(Resource::Courses, &[Read], Scope::All),
        ],
        Role::Counselor => vec![
            Permission::new(Resource::Leads, &[Create, Read, Update], Scope::Own),
            Permission::new(Resource::Analytics, &[Read], Scope::Own),
            Permission::new(Resource::Sales, &[Read], Scope::Own),
            Permission::new(Resource::Communications, &[Create, Read, Update], Scope::Own),
            Permission::new(Resource::Settings, &[Read], Scope::Own),
            Permission::new(Resource::Hospitals, &[Read], Scope::All),
            Permission::new(Resource::Courses, &[Read], Scope::All),
        ],
        Role::Unknown(_) => Vec::new(),
    };
    PermissionSet::from_entries(entries).0
}

// =============================================================================
//  EVALUATOR
// =============================================================================

/// Decides whether `user` may perform `action` on `resource`.
///
/// The action matches when it is granted directly or through `manage`. When a
/// `scope` is requested, the grant must be `all` or exactly that scope; a grant
/// without a scope never satisfies a scoped request.
pub fn has_permission(
    user: Option<&User>,
    resource: Resource,
    action: Action,
    scope: Option<Scope>,
) -> bool {
    let Some(user) = user else { return false };
    let Some(permission) = user.permissions.get(resource) else { return false };

    if !permission.allows(action) {
        return false;
    }

    if let Some(requested) = scope {
        if permission.scope != Some(Scope::All) && permission.scope != Some(requested) {
            return false;
        }
    }

    true
}

pub fn can_access_resource(user: Option<&User>, resource: Resource) -> bool {
    user.is_some_and(|u| u.permissions.contains(resource))
}

pub fn is_manager(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.role == Role::Manager)
}

pub fn is_team_lead(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.role == Role::TeamLead)
}

pub fn is_counselor(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.role == Role::Counselor)
}

// =============================================================================
//  HYDRATION
// =============================================================================

/// Turns a backend profile into a validated `User`. Runs once per session
/// build (login and refresh).
pub fn hydrate_user(payload: UserPayload) -> User {
    let role = Role::from(payload.role);
    if !role.is_known() {
        tracing::warn!(user_id = %payload.id, role = %role, "Profile has an unrecognized role; access will be denied");
    }

    // Backfill is decided on the wire list: explicit entries that all fail to
    // parse leave the user with nothing rather than the role defaults.
    let permissions = match payload.permissions {
        Some(entries) if !entries.is_empty() => {
            let parsed: Vec<Permission> = entries
                .into_iter()
                .filter_map(|entry| parse_permission(&payload.id, entry))
                .collect();

            let (permissions, dropped) = PermissionSet::from_entries(parsed);
            for duplicate in dropped {
                tracing::warn!(
                    user_id = %payload.id,
                    resource = %duplicate.resource,
                    "Duplicate permission entry ignored; the first one wins"
                );
            }
            if permissions.is_empty() {
                tracing::warn!(user_id = %payload.id, "No usable permission entry; access will be denied");
            }
            permissions
        }
        _ => {
            tracing::debug!(user_id = %payload.id, role = %role, "Backfilling permissions from role defaults");
            default_permissions(&role)
        }
    };

    let team_lead_id = match (&role, payload.team_lead_id) {
        (Role::Counselor, link) => link,
        (_, Some(link)) => {
            tracing::warn!(user_id = %payload.id, team_lead_id = %link, "teamLeadId on a non-counselor ignored");
            None
        }
        (_, None) => None,
    };

    let team_members = match (&role, payload.team_members) {
        (Role::TeamLead, members) => members.unwrap_or_default(),
        (_, Some(members)) if !members.is_empty() => {
            tracing::warn!(user_id = %payload.id, count = members.len(), "teamMembers on a non-team-lead ignored");
            Vec::new()
        }
        _ => Vec::new(),
    };

    User {
        id: payload.id,
        username: payload.username,
        name: payload.name,
        email: payload.email,
        role,
        branch: payload.branch,
        avatar: payload.avatar,
        team_lead_id,
        team_members,
        is_active: payload.is_active,
        permissions,
        created_at: payload.created_at,
        last_login: payload.last_login,
        created_by: payload.created_by,
    }
}

fn parse_permission(user_id: &str, entry: PermissionPayload) -> Option<Permission> {
    let resource = match entry.resource.parse::<Resource>() {
        Ok(resource) => resource,
        Err(e) => {
            tracing::warn!(user_id, "Permission entry dropped: {}", e);
            return None;
        }
    };

    let mut actions = std::collections::BTreeSet::new();
    for raw in &entry.actions {
        match raw.parse::<Action>() {
            Ok(action) => {
                actions.insert(action);
            }
            Err(e) => tracing::warn!(user_id, resource = %resource, "Ignoring {}", e),
        }
    }

    // A malformed scope is treated like a missing one.
    let scope = entry.scope.as_deref().and_then(|s| s.parse::<Scope>().ok());

    Some(Permission { resource, actions, scope })
}
