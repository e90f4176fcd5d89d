// src/services/visibility.rs

use crate::models::{auth::User, lead::Lead, rbac::Role};

/// Narrows a lead snapshot to what `user` may see.
///
/// - manager: everything, across branches and teams;
/// - team lead: own branch, assigned to the lead or to one of their members;
/// - counselor: own branch, assigned to the counselor;
/// - anything else (no user, unknown role): nothing.
///
/// Unassigned leads stay hidden from team leads and counselors. The result is
/// an order-preserving subset of `leads`.
pub fn get_accessible_leads(user: Option<&User>, leads: &[Lead]) -> Vec<Lead> {
    let Some(user) = user else { return Vec::new() };

    match &user.role {
        Role::Manager => leads.to_vec(),
        Role::TeamLead => leads
            .iter()
            .filter(|lead| lead.branch == user.branch && assigned_to_team(user, lead))
            .cloned()
            .collect(),
        Role::Counselor => leads
            .iter()
            .filter(|lead| {
                lead.branch == user.branch
                    && lead.assigned_counselor.as_deref() == Some(user.id.as_str())
            })
            .cloned()
            .collect(),
        Role::Unknown(_) => Vec::new(),
    }
}

fn assigned_to_team(team_lead: &User, lead: &Lead) -> bool {
    match lead.assigned_counselor.as_deref() {
        Some(assignee) => assignee == team_lead.id || team_lead.team_members.iter().any(|m| m == assignee),
        None => false,
    }
}

/// Same partitioning applied to the user directory: managers see everyone,
/// team leads see themselves and their members in their branch, counselors see
/// only themselves.
pub fn get_accessible_users(user: Option<&User>, users: &[User]) -> Vec<User> {
    let Some(viewer) = user else { return Vec::new() };

    match &viewer.role {
        Role::Manager => users.to_vec(),
        Role::TeamLead => users
            .iter()
            .filter(|u| {
                u.id == viewer.id
                    || (u.branch == viewer.branch && viewer.team_members.contains(&u.id))
            })
            .cloned()
            .collect(),
        Role::Counselor => users.iter().filter(|u| u.id == viewer.id).cloned().collect(),
        Role::Unknown(_) => Vec::new(),
    }
}
