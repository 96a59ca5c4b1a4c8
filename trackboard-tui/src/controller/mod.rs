//! Controllers plan jobs against the store and run them off the event loop.
//!
//! Planning is synchronous and owns every store mutation that happens before
//! a request (issuing tickets, marking a form as submitting). Running a job
//! only talks to the API and posts [`Update`]s back through the channel.
//! Re-fetches after a write are planned once the write has succeeded, so
//! their tickets are newer than anything issued while it was in flight.

pub mod dashboard;
pub mod workspace;

use crate::events::TuiEvent;
use crate::store::{DeleteTarget, RecordKind, Resource, Store, Ticket, Update};
use std::sync::Arc;
use tokio::sync::mpsc;
use trackboard_core::{
    MilestoneId, MilestoneInput, ProjectId, ProjectInput, RiskId, RiskInput, Submission,
    TrackerApi,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Project(Submission<ProjectInput, ProjectId>),
    Milestone(Submission<MilestoneInput, MilestoneId>),
    Risk(Submission<RiskInput, RiskId>),
    Delete(DeleteTarget),
}

impl Write {
    pub fn kind(&self) -> RecordKind {
        match self {
            Write::Project(_) => RecordKind::Project,
            Write::Milestone(_) => RecordKind::Milestone,
            Write::Risk(_) => RecordKind::Risk,
            Write::Delete(target) => target.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    FetchKpis(Ticket),
    FetchProjects(Ticket),
    FetchMilestones(Ticket, ProjectId),
    FetchRisks(Ticket, ProjectId),
    Summarize(Ticket, ProjectId),
    Write(Write),
}

/// An ordered list of requests. A failing step ends the job.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub label: &'static str,
    pub steps: Vec<Step>,
}

impl Job {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            steps: Vec::new(),
        }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn fetch_projects(self, store: &mut Store) -> Self {
        let ticket = store.issue(Resource::Projects);
        self.then(Step::FetchProjects(ticket))
    }

    pub fn fetch_milestones(self, store: &mut Store, project_id: ProjectId) -> Self {
        let ticket = store.issue(Resource::Milestones);
        self.then(Step::FetchMilestones(ticket, project_id))
    }

    pub fn fetch_risks(self, store: &mut Store, project_id: ProjectId) -> Self {
        let ticket = store.issue(Resource::Risks);
        self.then(Step::FetchRisks(ticket, project_id))
    }
}

/// Execute one step, returning its update and whether it succeeded.
pub async fn run_step(api: &dyn TrackerApi, step: Step) -> (Update, bool) {
    match step {
        Step::FetchKpis(ticket) => {
            let result = api.fetch_kpis().await;
            let ok = result.is_ok();
            (Update::Kpis(ticket, result), ok)
        }
        Step::FetchProjects(ticket) => {
            let result = api.list_projects().await;
            let ok = result.is_ok();
            (Update::Projects(ticket, result), ok)
        }
        Step::FetchMilestones(ticket, project_id) => {
            let result = api.list_milestones(project_id).await;
            let ok = result.is_ok();
            (Update::Milestones(ticket, project_id, result), ok)
        }
        Step::FetchRisks(ticket, project_id) => {
            let result = api.list_risks(project_id).await;
            let ok = result.is_ok();
            (Update::Risks(ticket, project_id, result), ok)
        }
        Step::Summarize(ticket, project_id) => {
            let result = api.summarize_project(project_id).await;
            let ok = result.is_ok();
            (Update::Summary(ticket, project_id, result), ok)
        }
        Step::Write(write) => {
            let kind = write.kind();
            let is_delete = matches!(write, Write::Delete(_));
            let result = perform_write(api, write).await;
            let ok = result.is_ok();
            let update = if is_delete {
                Update::Deleted(kind, result)
            } else {
                Update::Saved(kind, result)
            };
            (update, ok)
        }
    }
}

async fn perform_write(api: &dyn TrackerApi, write: Write) -> trackboard_core::ApiResult<()> {
    match write {
        Write::Project(Submission::Create(input)) => api.create_project(&input).await.map(drop),
        Write::Project(Submission::Update(id, input)) => {
            api.update_project(id, &input).await.map(drop)
        }
        Write::Milestone(Submission::Create(input)) => api.create_milestone(&input).await.map(drop),
        Write::Milestone(Submission::Update(id, input)) => {
            api.update_milestone(id, &input).await.map(drop)
        }
        Write::Risk(Submission::Create(input)) => api.create_risk(&input).await.map(drop),
        Write::Risk(Submission::Update(id, input)) => api.update_risk(id, &input).await.map(drop),
        Write::Delete(DeleteTarget::Project(id)) => api.delete_project(id).await,
        Write::Delete(DeleteTarget::Milestone(id)) => api.delete_milestone(id).await,
        Write::Delete(DeleteTarget::Risk(id)) => api.delete_risk(id).await,
    }
}

/// Run a job to completion, posting every step's update to the loop.
pub async fn run(api: Arc<dyn TrackerApi>, job: Job, sender: mpsc::Sender<TuiEvent>) {
    tracing::debug!(job = job.label, steps = job.steps.len(), "Running job");
    for step in job.steps {
        let (update, ok) = run_step(api.as_ref(), step).await;
        if sender.send(TuiEvent::Update(update)).await.is_err() {
            return;
        }
        if !ok {
            tracing::debug!(job = job.label, "Job stopped after failed step");
            return;
        }
    }
}

/// Spawn a job on the runtime.
pub fn spawn(api: Arc<dyn TrackerApi>, job: Job, sender: mpsc::Sender<TuiEvent>) {
    tokio::spawn(run(api, job, sender));
}
