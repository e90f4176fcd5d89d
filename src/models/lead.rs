// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::branch::BranchCode;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum LeadStatus {
    #[serde(rename = "hot")]
    Hot,
    #[serde(rename = "warm")]
    Warm,
    #[serde(rename = "followup")]
    Followup,
    #[serde(rename = "not interested")]
    NotInterested,
    #[serde(rename = "junk")]
    Junk,
    #[default]
    #[serde(rename = "fresh")]
    Fresh,
    #[serde(rename = "admission done")]
    AdmissionDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Qualification {
    #[serde(rename = "mbbs")]
    Mbbs,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "ms")]
    Ms,
    #[serde(rename = "bds")]
    Bds,
    #[serde(rename = "ayush")]
    Ayush,
    #[serde(rename = "md/ms")]
    MdMs,
    #[serde(rename = "others")]
    Others,
}

// --- LEAD ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(alias = "_id")]
    pub id: String,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub is_system: bool,
}

/// Prospective student record. Owned by the backend; this service only
/// narrows snapshots of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(alias = "_id")]
    pub id: String,

    // Human-facing id, e.g. "DMHCA-2024-0042".
    #[serde(default)]
    pub lead_id: Option<String>,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub qualification: Option<Qualification>,
    #[serde(default)]
    pub follow_up_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: LeadStatus,

    #[serde(default)]
    pub notes: Vec<Note>,

    // Unset means nobody is assigned; such leads are only visible to managers.
    #[serde(default)]
    pub assigned_counselor: Option<String>,

    pub branch: BranchCode,

    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub campaign: Option<String>,
    #[serde(default)]
    pub lead_score: i32,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// --- LISTING ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeadPage {
    pub data: Vec<Lead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Filters forwarded to the backend lead listing. Multi-valued filters are
/// repeated query keys (`?status=hot&status=warm`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeadQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub qualification: Vec<String>,
    #[serde(default)]
    pub branch: Vec<String>,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl LeadQuery {
    /// Flattens the query into `(key, value)` pairs in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.clone()));
        }
        let repeated: [(&'static str, &Vec<String>); 5] = [
            ("status", &self.status),
            ("source", &self.source),
            ("qualification", &self.qualification),
            ("branch", &self.branch),
            ("assignedTo", &self.assigned_to),
        ];
        for (key, values) in repeated {
            pairs.extend(values.iter().map(|v| (key, v.clone())));
        }
        if let Some(from) = &self.date_from {
            pairs.push(("dateFrom", from.clone()));
        }
        if let Some(to) = &self.date_to {
            pairs.push(("dateTo", to.clone()));
        }
        pairs
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeadSnapshotPayload {
    pub leads: Vec<Lead>,
}
