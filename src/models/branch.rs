// src/models/branch.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Physical academy location; the partition key of lead visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BranchCode {
    Delhi,
    Hyderabad,
    Kashmir,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub code: BranchCode,
    pub name: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub region: &'static str,
}

pub static BRANCHES: [Branch; 3] = [
    Branch {
        code: BranchCode::Delhi,
        name: "DMHCA Delhi",
        city: "New Delhi",
        state: "Delhi",
        region: "North India",
    },
    Branch {
        code: BranchCode::Hyderabad,
        name: "DMHCA Hyderabad",
        city: "Hyderabad",
        state: "Telangana",
        region: "South India",
    },
    Branch {
        code: BranchCode::Kashmir,
        name: "DMHCA Kashmir",
        city: "Srinagar",
        state: "Jammu & Kashmir",
        region: "North India",
    },
];
