//! Server-owned records and request bodies.

use crate::dates::{self, Timestamp};
use crate::enums::{MilestoneStatus, ProjectStatus, RiskSeverity, RiskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a project.
    ProjectId
);
record_id!(
    /// Identifier of a milestone.
    MilestoneId
);
record_id!(
    /// Identifier of a risk.
    RiskId
);

// ============================================================================
// RECORDS
// ============================================================================

/// A tracked project. `status` and `completion_percentage` are authoritative
/// server values; the client never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "dates")]
    pub start_date: Timestamp,
    #[serde(with = "dates")]
    pub deadline: Timestamp,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub completion_percentage: f64,
    #[serde(default, with = "dates::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, with = "dates::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "dates")]
    pub target_date: Timestamp,
    #[serde(default)]
    pub status: MilestoneStatus,
    #[serde(default, with = "dates::option", skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub id: RiskId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: RiskSeverity,
    #[serde(default)]
    pub mitigation_plan: Option<String>,
    #[serde(default)]
    pub status: RiskStatus,
}

/// Aggregate metrics over all projects, recomputed by the server per fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub projects_on_track: f64,
    pub avg_delay_percentage: f64,
    pub high_risk_count: u32,
    pub avg_completion: f64,
    #[serde(default)]
    pub total_projects: Option<u32>,
    #[serde(default)]
    pub milestone_completion: Option<f64>,
}

/// Body of `POST /api/ai/summarize/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Error body the server returns alongside non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

/// JSON body for creating or updating a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInput {
    pub name: String,
    pub owner: String,
    pub description: String,
    pub start_date: String,
    pub deadline: String,
    pub status: ProjectStatus,
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneInput {
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub target_date: String,
    pub status: MilestoneStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskInput {
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub severity: RiskSeverity,
    pub mitigation_plan: String,
    pub status: RiskStatus,
}

fn null_as_zero<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
