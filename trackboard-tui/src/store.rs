//! Client-side record store.
//!
//! The store is owned by the event loop. Fetch and write results only enter
//! through [`Store::apply`], which drops superseded responses by comparing
//! per-resource tickets and drops child results for a project that is no
//! longer current.

use std::collections::HashMap;
use trackboard_core::forms::EditableForm;
use trackboard_core::{
    ApiError, ApiResult, KpiSnapshot, Milestone, MilestoneForm, MilestoneId, Project, ProjectForm,
    ProjectId, Risk, RiskForm, RiskId, ValidationError,
};

// ============================================================================
// REQUEST SEQUENCING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Kpis,
    Projects,
    Milestones,
    Risks,
    Summary,
}

/// Identifies one issued fetch. Only the latest ticket per resource applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub resource: Resource,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: HashMap<Resource, u64>,
}

impl RequestSequencer {
    pub fn issue(&mut self, resource: Resource) -> Ticket {
        let seq = self.latest.entry(resource).or_insert(0);
        *seq += 1;
        Ticket {
            resource,
            seq: *seq,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.resource) == Some(&ticket.seq)
    }
}

// ============================================================================
// RECORD KINDS, FORMS, PROMPTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Project,
    Milestone,
    Risk,
}

impl RecordKind {
    pub fn noun(&self) -> &'static str {
        match self {
            RecordKind::Project => "project",
            RecordKind::Milestone => "milestone",
            RecordKind::Risk => "risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Project(ProjectForm),
    Milestone(MilestoneForm),
    Risk(RiskForm),
}

impl FormState {
    pub fn kind(&self) -> RecordKind {
        match self {
            FormState::Project(_) => RecordKind::Project,
            FormState::Milestone(_) => RecordKind::Milestone,
            FormState::Risk(_) => RecordKind::Risk,
        }
    }

    pub fn editable(&self) -> &dyn EditableForm {
        match self {
            FormState::Project(form) => form,
            FormState::Milestone(form) => form,
            FormState::Risk(form) => form,
        }
    }

    pub fn editable_mut(&mut self) -> &mut dyn EditableForm {
        match self {
            FormState::Project(form) => form,
            FormState::Milestone(form) => form,
            FormState::Risk(form) => form,
        }
    }
}

/// The form modal. Input survives a failed submit so it can be resubmitted.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenForm {
    pub form: FormState,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Project(ProjectId),
    Milestone(MilestoneId),
    Risk(RiskId),
}

impl DeleteTarget {
    pub fn kind(&self) -> RecordKind {
        match self {
            DeleteTarget::Project(_) => RecordKind::Project,
            DeleteTarget::Milestone(_) => RecordKind::Milestone,
            DeleteTarget::Risk(_) => RecordKind::Risk,
        }
    }
}

/// A delete awaiting yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub target: DeleteTarget,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryState {
    #[default]
    Idle,
    Loading,
    Ready(String),
    Failed(String),
}

pub const SUMMARY_ERROR: &str = "Error generating summary";

// ============================================================================
// UPDATES
// ============================================================================

/// A result delivered to the store by a controller job.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Kpis(Ticket, ApiResult<KpiSnapshot>),
    Projects(Ticket, ApiResult<Vec<Project>>),
    Milestones(Ticket, ProjectId, ApiResult<Vec<Milestone>>),
    Risks(Ticket, ProjectId, ApiResult<Vec<Risk>>),
    Summary(Ticket, ProjectId, ApiResult<String>),
    Saved(RecordKind, ApiResult<()>),
    Deleted(RecordKind, ApiResult<()>),
}

impl Update {
    /// The record kind of a write that succeeded, if this is one.
    pub fn written(&self) -> Option<RecordKind> {
        match self {
            Update::Saved(kind, Ok(())) | Update::Deleted(kind, Ok(())) => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Superseded by a later request, or for a project no longer current.
    Stale,
    /// A read failed; the previous state stays on screen.
    Swallowed,
    FormClosed,
    Alerted,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Default)]
pub struct Store {
    pub kpis: Option<KpiSnapshot>,
    pub projects: Vec<Project>,
    pub milestones: Vec<Milestone>,
    pub risks: Vec<Risk>,
    pub summary: SummaryState,
    pub form: Option<OpenForm>,
    pub pending_delete: Option<PendingDelete>,
    pub alert: Option<String>,
    current_project_id: Option<ProjectId>,
    sequencer: RequestSequencer,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, resource: Resource) -> Ticket {
        self.sequencer.issue(resource)
    }

    pub fn current_project_id(&self) -> Option<ProjectId> {
        self.current_project_id
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_project_id.and_then(|id| self.project(id))
    }

    /// Switch projects. Child lists and the summary belong to the previous
    /// project, so they are cleared.
    pub fn set_current_project(&mut self, project_id: Option<ProjectId>) {
        if self.current_project_id != project_id {
            self.milestones.clear();
            self.risks.clear();
            self.summary = SummaryState::Idle;
        }
        self.current_project_id = project_id;
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn milestone(&self, id: MilestoneId) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    pub fn risk(&self, id: RiskId) -> Option<&Risk> {
        self.risks.iter().find(|r| r.id == id)
    }

    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(OpenForm {
            form,
            error: None,
            submitting: false,
        });
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn set_form_error(&mut self, error: &ValidationError) {
        if let Some(open) = self.form.as_mut() {
            open.error = Some(error.to_string());
        }
    }

    /// Mark the open form as in flight. False when there is no form or a
    /// submit is already pending.
    pub fn begin_submit(&mut self) -> bool {
        match self.form.as_mut() {
            Some(open) if !open.submitting => {
                open.submitting = true;
                open.error = None;
                true
            }
            _ => false,
        }
    }

    pub fn request_delete(&mut self, target: DeleteTarget, prompt: impl Into<String>) {
        self.pending_delete = Some(PendingDelete {
            target,
            prompt: prompt.into(),
        });
    }

    pub fn take_pending_delete(&mut self) -> Option<PendingDelete> {
        self.pending_delete.take()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Start a summary request for the current project.
    pub fn begin_summary(&mut self) -> Option<(Ticket, ProjectId)> {
        let project_id = self.current_project_id?;
        self.summary = SummaryState::Loading;
        Some((self.issue(Resource::Summary), project_id))
    }

    fn accepts(&self, ticket: Ticket, project_id: Option<ProjectId>) -> bool {
        let current = self.sequencer.is_current(ticket);
        let same_project = project_id.map_or(true, |id| self.current_project_id == Some(id));
        if !(current && same_project) {
            tracing::debug!(resource = ?ticket.resource, seq = ticket.seq, "Dropping stale response");
        }
        current && same_project
    }

    pub fn apply(&mut self, update: Update) -> Outcome {
        match update {
            Update::Kpis(ticket, result) => {
                if !self.accepts(ticket, None) {
                    return Outcome::Stale;
                }
                match result {
                    Ok(kpis) => {
                        self.kpis = Some(kpis);
                        Outcome::Applied
                    }
                    Err(err) => swallow("kpis", &err),
                }
            }
            Update::Projects(ticket, result) => {
                if !self.accepts(ticket, None) {
                    return Outcome::Stale;
                }
                match result {
                    Ok(projects) => {
                        self.projects = projects;
                        // the current project was deleted elsewhere
                        if let Some(id) = self.current_project_id {
                            if self.project(id).is_none() {
                                self.set_current_project(None);
                            }
                        }
                        Outcome::Applied
                    }
                    Err(err) => swallow("projects", &err),
                }
            }
            Update::Milestones(ticket, project_id, result) => {
                if !self.accepts(ticket, Some(project_id)) {
                    return Outcome::Stale;
                }
                match result {
                    Ok(milestones) => {
                        self.milestones = milestones;
                        Outcome::Applied
                    }
                    Err(err) => swallow("milestones", &err),
                }
            }
            Update::Risks(ticket, project_id, result) => {
                if !self.accepts(ticket, Some(project_id)) {
                    return Outcome::Stale;
                }
                match result {
                    Ok(risks) => {
                        self.risks = risks;
                        Outcome::Applied
                    }
                    Err(err) => swallow("risks", &err),
                }
            }
            Update::Summary(ticket, project_id, result) => {
                if !self.accepts(ticket, Some(project_id)) {
                    return Outcome::Stale;
                }
                self.summary = match result {
                    Ok(text) => SummaryState::Ready(text),
                    Err(err) => {
                        tracing::warn!(error = %err, project_id = %project_id, "Summary failed");
                        SummaryState::Failed(SUMMARY_ERROR.to_string())
                    }
                };
                Outcome::Applied
            }
            Update::Saved(kind, Ok(())) => {
                tracing::info!(kind = kind.noun(), "Saved");
                self.form = None;
                Outcome::FormClosed
            }
            Update::Saved(kind, Err(err)) => {
                tracing::warn!(kind = kind.noun(), error = %err, "Save failed");
                if let Some(open) = self.form.as_mut() {
                    open.submitting = false;
                    open.error = Some(err.to_string());
                }
                self.alert = Some(format!("Error saving {}: {}", kind.noun(), err));
                Outcome::Alerted
            }
            Update::Deleted(kind, Ok(())) => {
                tracing::info!(kind = kind.noun(), "Deleted");
                Outcome::Applied
            }
            Update::Deleted(kind, Err(err)) => {
                tracing::warn!(kind = kind.noun(), error = %err, "Delete failed");
                self.alert = Some(format!("Error deleting {}: {}", kind.noun(), err));
                Outcome::Alerted
            }
        }
    }
}

fn swallow(resource: &'static str, err: &ApiError) -> Outcome {
    tracing::warn!(resource, error = %err, "Fetch failed; keeping previous data");
    Outcome::Swallowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackboard_test_utils::fixtures;
    use trackboard_test_utils::{MilestoneStatus, ProjectStatus};

    #[test]
    fn later_ticket_wins_regardless_of_arrival_order() {
        let mut store = Store::new();
        let first = store.issue(Resource::Projects);
        let second = store.issue(Resource::Projects);

        let fresh = vec![fixtures::project(1, "Fresh", ProjectStatus::InProgress, 10.0)];
        let old = vec![fixtures::project(2, "Old", ProjectStatus::OnHold, 5.0)];

        assert_eq!(store.apply(Update::Projects(second, Ok(fresh))), Outcome::Applied);
        assert_eq!(store.apply(Update::Projects(first, Ok(old))), Outcome::Stale);
        assert_eq!(store.projects[0].name, "Fresh");
    }

    #[test]
    fn tickets_are_per_resource() {
        let mut store = Store::new();
        let projects = store.issue(Resource::Projects);
        let _kpis = store.issue(Resource::Kpis);
        assert_eq!(
            store.apply(Update::Projects(projects, Ok(fixtures::two_projects()))),
            Outcome::Applied
        );
    }

    #[test]
    fn child_results_for_another_project_are_dropped() {
        let mut store = Store::new();
        store.set_current_project(Some(ProjectId(1)));
        let ticket = store.issue(Resource::Milestones);
        store.set_current_project(Some(ProjectId(2)));
        let milestones = vec![fixtures::milestone(1, 1, "Kickoff", MilestoneStatus::Pending)];
        assert_eq!(
            store.apply(Update::Milestones(ticket, ProjectId(1), Ok(milestones))),
            Outcome::Stale
        );
        assert!(store.milestones.is_empty());
    }

    #[test]
    fn switching_project_clears_children() {
        let mut store = Store::new();
        store.set_current_project(Some(ProjectId(1)));
        store.milestones = vec![fixtures::milestone(1, 1, "Kickoff", MilestoneStatus::Pending)];
        store.summary = SummaryState::Ready("ok".into());
        store.set_current_project(Some(ProjectId(1)));
        assert_eq!(store.milestones.len(), 1);
        store.set_current_project(Some(ProjectId(2)));
        assert!(store.milestones.is_empty());
        assert_eq!(store.summary, SummaryState::Idle);
    }

    #[test]
    fn read_failure_keeps_previous_data() {
        let mut store = Store::new();
        let ok = store.issue(Resource::Projects);
        store.apply(Update::Projects(ok, Ok(fixtures::two_projects())));
        let failing = store.issue(Resource::Projects);
        let outcome = store.apply(Update::Projects(
            failing,
            Err(ApiError::Transport("timeout".into())),
        ));
        assert_eq!(outcome, Outcome::Swallowed);
        assert_eq!(store.projects.len(), 2);
        assert!(store.alert.is_none());
    }

    #[test]
    fn save_failure_alerts_and_keeps_form() {
        let mut store = Store::new();
        let mut form = MilestoneForm::blank(ProjectId(1));
        form.name = "Beta".into();
        store.open_form(FormState::Milestone(form));
        assert!(store.begin_submit());
        assert!(!store.begin_submit());

        let outcome = store.apply(Update::Saved(
            RecordKind::Milestone,
            Err(ApiError::Status {
                status: 400,
                message: "bad date".into(),
            }),
        ));
        assert_eq!(outcome, Outcome::Alerted);
        let open = store.form.as_ref().unwrap();
        assert!(!open.submitting);
        assert_eq!(open.form.editable().fields()[0].value, "Beta");
        assert!(store.alert.as_deref().unwrap().contains("bad date"));

        assert!(store.begin_submit());
        assert_eq!(store.apply(Update::Saved(RecordKind::Milestone, Ok(()))), Outcome::FormClosed);
        assert!(store.form.is_none());
    }

    #[test]
    fn summary_failure_shows_fixed_message() {
        let mut store = Store::new();
        assert!(store.begin_summary().is_none());
        store.set_current_project(Some(ProjectId(3)));
        let (ticket, project_id) = store.begin_summary().unwrap();
        assert_eq!(store.summary, SummaryState::Loading);
        store.apply(Update::Summary(
            ticket,
            project_id,
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            }),
        ));
        assert_eq!(store.summary, SummaryState::Failed(SUMMARY_ERROR.into()));
    }
}
