//! Trackboard Test Utilities
//!
//! Shared test infrastructure for the Trackboard workspace:
//! - An in-memory [`TrackerApi`] that records every call
//! - Proptest generators for records
//! - Fixtures for common scenarios

pub use trackboard_core::{
    ApiError, ApiResult, KpiSnapshot, Milestone, MilestoneId, MilestoneInput, MilestoneStatus,
    Project, ProjectId, ProjectInput, ProjectStatus, Risk, RiskId, RiskInput, RiskSeverity,
    RiskStatus, Timestamp, TrackerApi,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use trackboard_core::dates;

// ============================================================================
// CALL LOG
// ============================================================================

/// One request made against the in-memory tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchKpis,
    ListProjects,
    CreateProject(ProjectInput),
    UpdateProject(ProjectId, ProjectInput),
    DeleteProject(ProjectId),
    ListMilestones(ProjectId),
    CreateMilestone(MilestoneInput),
    UpdateMilestone(MilestoneId, MilestoneInput),
    DeleteMilestone(MilestoneId),
    ListRisks(ProjectId),
    CreateRisk(RiskInput),
    UpdateRisk(RiskId, RiskInput),
    DeleteRisk(RiskId),
    Summarize(ProjectId),
}

/// Endpoint a call hits, used to target failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Kpis,
    ListProjects,
    WriteProject,
    ListMilestones,
    WriteMilestone,
    ListRisks,
    WriteRisk,
    Summarize,
}

impl ApiCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiCall::FetchKpis => Endpoint::Kpis,
            ApiCall::ListProjects => Endpoint::ListProjects,
            ApiCall::CreateProject(_) | ApiCall::UpdateProject(..) | ApiCall::DeleteProject(_) => {
                Endpoint::WriteProject
            }
            ApiCall::ListMilestones(_) => Endpoint::ListMilestones,
            ApiCall::CreateMilestone(_)
            | ApiCall::UpdateMilestone(..)
            | ApiCall::DeleteMilestone(_) => Endpoint::WriteMilestone,
            ApiCall::ListRisks(_) => Endpoint::ListRisks,
            ApiCall::CreateRisk(_) | ApiCall::UpdateRisk(..) | ApiCall::DeleteRisk(_) => {
                Endpoint::WriteRisk
            }
            ApiCall::Summarize(_) => Endpoint::Summarize,
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            ApiCall::CreateProject(_)
            | ApiCall::CreateMilestone(_)
            | ApiCall::CreateRisk(_)
            | ApiCall::Summarize(_) => "POST",
            ApiCall::UpdateProject(..) | ApiCall::UpdateMilestone(..) | ApiCall::UpdateRisk(..) => {
                "PUT"
            }
            ApiCall::DeleteProject(_) | ApiCall::DeleteMilestone(_) | ApiCall::DeleteRisk(_) => {
                "DELETE"
            }
            _ => "GET",
        }
    }
}

// ============================================================================
// IN-MEMORY TRACKER
// ============================================================================

#[derive(Debug, Default)]
struct TrackerData {
    projects: Vec<Project>,
    milestones: Vec<Milestone>,
    risks: Vec<Risk>,
    kpis: KpiSnapshot,
    summaries: HashMap<ProjectId, String>,
    next_id: i64,
    calls: Vec<ApiCall>,
    failures: HashMap<Endpoint, ApiError>,
}

impl TrackerData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Mirrors the server: completion is the share of completed milestones.
    fn recompute_completion(&mut self, project_id: ProjectId) {
        let milestones: Vec<_> = self
            .milestones
            .iter()
            .filter(|m| m.project_id == project_id)
            .collect();
        if milestones.is_empty() {
            return;
        }
        let done = milestones.iter().filter(|m| m.status.is_completed()).count();
        let completion = done as f64 * 100.0 / milestones.len() as f64;
        if let Some(project) = self.projects.iter_mut().find(|p| p.id == project_id) {
            project.completion_percentage = completion;
        }
    }
}

/// A [`TrackerApi`] backed by vectors, with a call log and failure injection.
///
/// Clones share state, so a test can keep a handle while the code under
/// test owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTracker {
    data: Arc<Mutex<TrackerData>>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        {
            let mut data = self.lock();
            let max = projects.iter().map(|p| p.id.get()).max().unwrap_or(0);
            data.next_id = data.next_id.max(max);
            data.projects = projects;
        }
        self
    }

    pub fn with_milestones(self, milestones: Vec<Milestone>) -> Self {
        {
            let mut data = self.lock();
            let max = milestones.iter().map(|m| m.id.get()).max().unwrap_or(0);
            data.next_id = data.next_id.max(max);
            data.milestones = milestones;
        }
        self
    }

    pub fn with_risks(self, risks: Vec<Risk>) -> Self {
        {
            let mut data = self.lock();
            let max = risks.iter().map(|r| r.id.get()).max().unwrap_or(0);
            data.next_id = data.next_id.max(max);
            data.risks = risks;
        }
        self
    }

    pub fn set_kpis(&self, kpis: KpiSnapshot) {
        self.lock().kpis = kpis;
    }

    pub fn set_summary(&self, project_id: ProjectId, summary: impl Into<String>) {
        self.lock().summaries.insert(project_id, summary.into());
    }

    /// Make every call to `endpoint` fail with `error` until cleared.
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.lock().failures.insert(endpoint, error);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of recorded calls hitting `endpoint`.
    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .count()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.lock().projects.clone()
    }

    pub fn milestones(&self) -> Vec<Milestone> {
        self.lock().milestones.clone()
    }

    pub fn risks(&self) -> Vec<Risk> {
        self.lock().risks.clone()
    }

    /// Record the call and return the injected failure for its endpoint.
    fn record(&self, call: ApiCall) -> ApiResult<MutexGuard<'_, TrackerData>> {
        let mut data = self.lock();
        let endpoint = call.endpoint();
        data.calls.push(call);
        match data.failures.get(&endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(data),
        }
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{kind} {id} not found"),
    }
}

fn bad_date(raw: &str) -> ApiError {
    ApiError::Status {
        status: 400,
        message: format!("Invalid isoformat string: '{raw}'"),
    }
}

fn parse_date(raw: &str) -> ApiResult<Timestamp> {
    dates::parse_timestamp(raw).ok_or_else(|| bad_date(raw))
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

#[async_trait]
impl TrackerApi for InMemoryTracker {
    async fn fetch_kpis(&self) -> ApiResult<KpiSnapshot> {
        let data = self.record(ApiCall::FetchKpis)?;
        Ok(data.kpis.clone())
    }

    async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        let data = self.record(ApiCall::ListProjects)?;
        Ok(data.projects.clone())
    }

    async fn create_project(&self, input: &ProjectInput) -> ApiResult<Project> {
        let mut data = self.record(ApiCall::CreateProject(input.clone()))?;
        let project = Project {
            id: ProjectId(data.next_id()),
            name: input.name.clone(),
            owner: input.owner.clone(),
            description: non_empty(&input.description),
            start_date: parse_date(&input.start_date)?,
            deadline: parse_date(&input.deadline)?,
            status: input.status,
            completion_percentage: input.completion_percentage,
            created_at: None,
            updated_at: None,
        };
        data.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: ProjectId, input: &ProjectInput) -> ApiResult<Project> {
        let mut data = self.record(ApiCall::UpdateProject(id, input.clone()))?;
        let start_date = parse_date(&input.start_date)?;
        let deadline = parse_date(&input.deadline)?;
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Project", id))?;
        project.name = input.name.clone();
        project.owner = input.owner.clone();
        project.description = non_empty(&input.description);
        project.start_date = start_date;
        project.deadline = deadline;
        project.status = input.status;
        project.completion_percentage = input.completion_percentage;
        Ok(project.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> ApiResult<()> {
        let mut data = self.record(ApiCall::DeleteProject(id))?;
        let before = data.projects.len();
        data.projects.retain(|p| p.id != id);
        if data.projects.len() == before {
            return Err(not_found("Project", id));
        }
        data.milestones.retain(|m| m.project_id != id);
        data.risks.retain(|r| r.project_id != id);
        Ok(())
    }

    async fn list_milestones(&self, project_id: ProjectId) -> ApiResult<Vec<Milestone>> {
        let data = self.record(ApiCall::ListMilestones(project_id))?;
        Ok(data
            .milestones
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_milestone(&self, input: &MilestoneInput) -> ApiResult<Milestone> {
        let mut data = self.record(ApiCall::CreateMilestone(input.clone()))?;
        let completion_date = match input.completion_date.as_deref() {
            Some(raw) => Some(parse_date(raw)?),
            None => None,
        };
        let milestone = Milestone {
            id: MilestoneId(data.next_id()),
            project_id: input.project_id,
            name: input.name.clone(),
            description: non_empty(&input.description),
            target_date: parse_date(&input.target_date)?,
            status: input.status,
            completion_date,
        };
        data.milestones.push(milestone.clone());
        data.recompute_completion(input.project_id);
        Ok(milestone)
    }

    async fn update_milestone(&self, id: MilestoneId, input: &MilestoneInput) -> ApiResult<Milestone> {
        let mut data = self.record(ApiCall::UpdateMilestone(id, input.clone()))?;
        let target_date = parse_date(&input.target_date)?;
        let milestone = data
            .milestones
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Milestone", id))?;
        milestone.name = input.name.clone();
        milestone.description = non_empty(&input.description);
        milestone.target_date = target_date;
        milestone.status = input.status;
        let updated = milestone.clone();
        data.recompute_completion(updated.project_id);
        Ok(updated)
    }

    async fn delete_milestone(&self, id: MilestoneId) -> ApiResult<()> {
        let mut data = self.record(ApiCall::DeleteMilestone(id))?;
        let project_id = data
            .milestones
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.project_id)
            .ok_or_else(|| not_found("Milestone", id))?;
        data.milestones.retain(|m| m.id != id);
        data.recompute_completion(project_id);
        Ok(())
    }

    async fn list_risks(&self, project_id: ProjectId) -> ApiResult<Vec<Risk>> {
        let data = self.record(ApiCall::ListRisks(project_id))?;
        Ok(data
            .risks
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_risk(&self, input: &RiskInput) -> ApiResult<Risk> {
        let mut data = self.record(ApiCall::CreateRisk(input.clone()))?;
        let risk = Risk {
            id: RiskId(data.next_id()),
            project_id: input.project_id,
            name: input.name.clone(),
            description: non_empty(&input.description),
            severity: input.severity,
            mitigation_plan: non_empty(&input.mitigation_plan),
            status: input.status.clone(),
        };
        data.risks.push(risk.clone());
        Ok(risk)
    }

    async fn update_risk(&self, id: RiskId, input: &RiskInput) -> ApiResult<Risk> {
        let mut data = self.record(ApiCall::UpdateRisk(id, input.clone()))?;
        let risk = data
            .risks
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Risk", id))?;
        risk.name = input.name.clone();
        risk.description = non_empty(&input.description);
        risk.severity = input.severity;
        risk.mitigation_plan = non_empty(&input.mitigation_plan);
        risk.status = input.status.clone();
        Ok(risk.clone())
    }

    async fn delete_risk(&self, id: RiskId) -> ApiResult<()> {
        let mut data = self.record(ApiCall::DeleteRisk(id))?;
        let before = data.risks.len();
        data.risks.retain(|r| r.id != id);
        if data.risks.len() == before {
            return Err(not_found("Risk", id));
        }
        Ok(())
    }

    async fn summarize_project(&self, project_id: ProjectId) -> ApiResult<String> {
        let data = self.record(ApiCall::Summarize(project_id))?;
        if let Some(summary) = data.summaries.get(&project_id) {
            return Ok(summary.clone());
        }
        let project = data
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| not_found("Project", project_id))?;
        Ok(format!(
            "{} is {} at {}% completion.",
            project.name,
            project.status.label(),
            project.completion_percentage
        ))
    }

    fn export_csv_url(&self) -> String {
        format!("memory://{}", trackboard_core::api::endpoints::EXPORT_CSV)
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Trackboard records.

    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (0i64..3650).prop_map(|days| fixtures::ts(2020, 1, 1) + Duration::days(days))
    }

    pub fn arb_project_status() -> impl Strategy<Value = ProjectStatus> {
        prop::sample::select(ProjectStatus::ALL.to_vec())
    }

    pub fn arb_milestone_status() -> impl Strategy<Value = MilestoneStatus> {
        prop::sample::select(MilestoneStatus::ALL.to_vec())
    }

    pub fn arb_severity() -> impl Strategy<Value = RiskSeverity> {
        prop::sample::select(RiskSeverity::ALL.to_vec())
    }

    pub fn arb_completion() -> impl Strategy<Value = f64> {
        (0u32..=1000).prop_map(|tenths| tenths as f64 / 10.0)
    }

    /// Valid form date text, `YYYY-MM-DD`.
    pub fn arb_form_date() -> impl Strategy<Value = String> {
        (2000i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "2000-01-01".to_string())
        })
    }

    pub fn arb_project() -> impl Strategy<Value = Project> {
        (
            1i64..10_000,
            "[A-Za-z][A-Za-z ]{0,20}",
            "[A-Z][a-z]{1,10}",
            arb_timestamp(),
            arb_timestamp(),
            arb_project_status(),
            arb_completion(),
        )
            .prop_map(|(id, name, owner, start, deadline, status, completion)| Project {
                id: ProjectId(id),
                name,
                owner,
                description: None,
                start_date: start,
                deadline,
                status,
                completion_percentage: completion,
                created_at: None,
                updated_at: None,
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made records for common scenarios.

    use super::*;
    use chrono::NaiveDate;

    /// Midnight on the given date. Panics on an invalid date.
    pub fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_else(|| panic!("invalid fixture date {y}-{m}-{d}"))
    }

    pub fn project(id: i64, name: &str, status: ProjectStatus, completion: f64) -> Project {
        Project {
            id: ProjectId(id),
            name: name.to_string(),
            owner: "Alex".to_string(),
            description: Some(format!("{name} description")),
            start_date: ts(2025, 1, 1),
            deadline: ts(2025, 12, 31),
            status,
            completion_percentage: completion,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn milestone(id: i64, project_id: i64, name: &str, status: MilestoneStatus) -> Milestone {
        Milestone {
            id: MilestoneId(id),
            project_id: ProjectId(project_id),
            name: name.to_string(),
            description: None,
            target_date: ts(2025, 6, 30),
            status,
            completion_date: status.is_completed().then(|| ts(2025, 6, 1)),
        }
    }

    pub fn risk(id: i64, project_id: i64, name: &str, severity: RiskSeverity) -> Risk {
        Risk {
            id: RiskId(id),
            project_id: ProjectId(project_id),
            name: name.to_string(),
            description: None,
            severity,
            mitigation_plan: Some("Monitor weekly".to_string()),
            status: RiskStatus::Open,
        }
    }

    /// The two-project portfolio used across dashboard tests.
    pub fn two_projects() -> Vec<Project> {
        vec![
            project(1, "Website relaunch", ProjectStatus::InProgress, 65.0),
            project(2, "Billing migration", ProjectStatus::Completed, 100.0),
        ]
    }

    pub fn sample_kpis() -> KpiSnapshot {
        KpiSnapshot {
            projects_on_track: 50.0,
            avg_delay_percentage: 0.0,
            high_risk_count: 1,
            avg_completion: 82.5,
            total_projects: Some(2),
            milestone_completion: Some(50.0),
        }
    }

    /// A tracker seeded with [`two_projects`], one milestone each, and a risk.
    pub fn seeded_tracker() -> InMemoryTracker {
        let tracker = InMemoryTracker::new()
            .with_projects(two_projects())
            .with_milestones(vec![
                milestone(10, 1, "Design sign-off", MilestoneStatus::Completed),
                milestone(11, 1, "Launch", MilestoneStatus::Pending),
                milestone(12, 2, "Cutover", MilestoneStatus::Completed),
            ])
            .with_risks(vec![risk(20, 1, "Vendor delay", RiskSeverity::High)]);
        tracker.set_kpis(sample_kpis());
        tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone_input(project_id: i64, status: MilestoneStatus) -> MilestoneInput {
        MilestoneInput {
            project_id: ProjectId(project_id),
            name: "Extra".into(),
            description: String::new(),
            target_date: "2025-07-01T00:00:00".into(),
            status,
            completion_date: None,
        }
    }

    #[tokio::test]
    async fn milestone_writes_recompute_project_completion() {
        let tracker = fixtures::seeded_tracker();
        tracker
            .create_milestone(&milestone_input(1, MilestoneStatus::Completed))
            .await
            .unwrap();
        let project = tracker.projects().into_iter().find(|p| p.id == ProjectId(1)).unwrap();
        assert!((project.completion_percentage - 200.0 / 3.0).abs() < 1e-9);

        tracker.delete_milestone(MilestoneId(11)).await.unwrap();
        let project = tracker.projects().into_iter().find(|p| p.id == ProjectId(1)).unwrap();
        assert_eq!(project.completion_percentage, 100.0);
    }

    #[tokio::test]
    async fn injected_failures_are_recorded_and_returned() {
        let tracker = fixtures::seeded_tracker();
        tracker.fail(Endpoint::ListProjects, ApiError::Transport("offline".into()));
        assert!(tracker.list_projects().await.is_err());
        assert_eq!(tracker.count(Endpoint::ListProjects), 1);
        tracker.clear_failures();
        assert_eq!(tracker.list_projects().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let tracker = InMemoryTracker::new();
        let err = tracker.delete_risk(RiskId(99)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(tracker.calls()[0].method(), "DELETE");
    }
}
