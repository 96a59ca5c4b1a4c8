//! The tracker REST API as seen by the client.
//!
//! The server owns validation, status computation, completion aggregation,
//! and persistence. Implementations of [`TrackerApi`] are thin transports.

use crate::entities::{
    KpiSnapshot, Milestone, MilestoneId, MilestoneInput, Project, ProjectId, ProjectInput, Risk,
    RiskId, RiskInput,
};
use crate::error::ApiResult;
use async_trait::async_trait;

#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn fetch_kpis(&self) -> ApiResult<KpiSnapshot>;

    async fn list_projects(&self) -> ApiResult<Vec<Project>>;
    async fn create_project(&self, input: &ProjectInput) -> ApiResult<Project>;
    async fn update_project(&self, id: ProjectId, input: &ProjectInput) -> ApiResult<Project>;
    async fn delete_project(&self, id: ProjectId) -> ApiResult<()>;

    async fn list_milestones(&self, project_id: ProjectId) -> ApiResult<Vec<Milestone>>;
    async fn create_milestone(&self, input: &MilestoneInput) -> ApiResult<Milestone>;
    async fn update_milestone(&self, id: MilestoneId, input: &MilestoneInput) -> ApiResult<Milestone>;
    async fn delete_milestone(&self, id: MilestoneId) -> ApiResult<()>;

    async fn list_risks(&self, project_id: ProjectId) -> ApiResult<Vec<Risk>>;
    async fn create_risk(&self, input: &RiskInput) -> ApiResult<Risk>;
    async fn update_risk(&self, id: RiskId, input: &RiskInput) -> ApiResult<Risk>;
    async fn delete_risk(&self, id: RiskId) -> ApiResult<()>;

    /// Ask the server for a generated project summary. Returned verbatim.
    async fn summarize_project(&self, project_id: ProjectId) -> ApiResult<String>;

    /// Absolute URL of the CSV export. Exports are navigation only.
    fn export_csv_url(&self) -> String;
}

/// Endpoint paths, relative to the API base URL.
pub mod endpoints {
    use crate::entities::{MilestoneId, ProjectId, RiskId};

    pub const KPIS: &str = "/api/kpis";
    pub const PROJECTS: &str = "/api/projects";
    pub const MILESTONES: &str = "/api/milestones";
    pub const RISKS: &str = "/api/risks";
    pub const EXPORT_CSV: &str = "/api/export/csv";

    pub fn project(id: ProjectId) -> String {
        format!("{PROJECTS}/{id}")
    }

    pub fn milestone(id: MilestoneId) -> String {
        format!("{MILESTONES}/{id}")
    }

    pub fn risk(id: RiskId) -> String {
        format!("{RISKS}/{id}")
    }

    /// Query pairs scoping a child listing to one project.
    pub fn project_scope(project_id: ProjectId) -> [(&'static str, String); 1] {
        [("project_id", project_id.to_string())]
    }

    pub fn summarize(project_id: ProjectId) -> String {
        format!("/api/ai/summarize/{project_id}")
    }

}
