// src/services/team_service.rs

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{auth::User, rbac::Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TeamLinkViolation {
    /// `teamLeadId` / `teamMembers` names an id that is not in the directory.
    MissingUser { user_id: String, link: String },
    /// Counselor's `teamLeadId` points at someone who is not a team lead.
    NotATeamLead { counselor_id: String, team_lead_id: String },
    /// A team lead's member is not a counselor.
    NotACounselor { team_lead_id: String, member_id: String },
}

/// Checks the back-reference invariants of a user directory. Both directions
/// are lookups only, so violations are reported rather than repaired.
pub fn verify_team_links(users: &[User]) -> Vec<TeamLinkViolation> {
    let by_id: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();
    let mut violations = Vec::new();

    for user in users {
        match user.role {
            Role::Counselor => {
                if let Some(lead_id) = &user.team_lead_id {
                    match by_id.get(lead_id.as_str()) {
                        None => violations.push(TeamLinkViolation::MissingUser {
                            user_id: user.id.clone(),
                            link: lead_id.clone(),
                        }),
                        Some(target) if target.role != Role::TeamLead => {
                            violations.push(TeamLinkViolation::NotATeamLead {
                                counselor_id: user.id.clone(),
                                team_lead_id: lead_id.clone(),
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
            Role::TeamLead => {
                for member_id in &user.team_members {
                    match by_id.get(member_id.as_str()) {
                        None => violations.push(TeamLinkViolation::MissingUser {
                            user_id: user.id.clone(),
                            link: member_id.clone(),
                        }),
                        Some(target) if target.role != Role::Counselor => {
                            violations.push(TeamLinkViolation::NotACounselor {
                                team_lead_id: user.id.clone(),
                                member_id: member_id.clone(),
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
            _ => {}
        }
    }

    violations
}
