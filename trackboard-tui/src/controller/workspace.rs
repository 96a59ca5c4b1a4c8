//! Project workspace: project cards, the selected project's milestones and
//! risks, record forms, deletes, and summaries.

use super::{Job, Step, Write};
use crate::store::{DeleteTarget, FormState, RecordKind, Store};
use chrono::NaiveDate;
use trackboard_core::{
    MilestoneForm, MilestoneId, ProjectForm, ProjectId, RiskForm, RiskId, Timestamp,
};

/// Why a workspace action did nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Notice {
    #[error("Select a project first")]
    NoCurrentProject,
    #[error("That {} is not loaded; refresh and try again", .0.noun())]
    NotLoaded(RecordKind),
}

// ============================================================================
// LISTING
// ============================================================================

pub fn load_projects(store: &mut Store) -> Job {
    Job::new("load projects").fetch_projects(store)
}

/// Milestones then risks for the current project.
pub fn load_children(store: &mut Store) -> Option<Job> {
    let project_id = store.current_project_id()?;
    Some(
        Job::new("load project children")
            .fetch_milestones(store, project_id)
            .fetch_risks(store, project_id),
    )
}

/// Make `project_id` current and fetch its children.
pub fn view_project(store: &mut Store, project_id: ProjectId) -> Job {
    store.set_current_project(Some(project_id));
    Job::new("view project")
        .fetch_milestones(store, project_id)
        .fetch_risks(store, project_id)
}

// ============================================================================
// FORMS
// ============================================================================

pub fn open_create(store: &mut Store, kind: RecordKind, today: NaiveDate) -> Result<(), Notice> {
    let form = match kind {
        RecordKind::Project => FormState::Project(ProjectForm::blank(today)),
        RecordKind::Milestone => {
            let project_id = store.current_project_id().ok_or(Notice::NoCurrentProject)?;
            FormState::Milestone(MilestoneForm::blank(project_id))
        }
        RecordKind::Risk => {
            let project_id = store.current_project_id().ok_or(Notice::NoCurrentProject)?;
            FormState::Risk(RiskForm::blank(project_id))
        }
    };
    store.open_form(form);
    Ok(())
}

/// Edit forms are filled from the last fetched lists only.
pub fn open_edit_project(store: &mut Store, id: ProjectId) -> Result<(), Notice> {
    let form = store
        .project(id)
        .map(ProjectForm::edit)
        .ok_or(Notice::NotLoaded(RecordKind::Project))?;
    store.open_form(FormState::Project(form));
    Ok(())
}

pub fn open_edit_milestone(store: &mut Store, id: MilestoneId) -> Result<(), Notice> {
    let form = store
        .milestone(id)
        .map(MilestoneForm::edit)
        .ok_or(Notice::NotLoaded(RecordKind::Milestone))?;
    store.open_form(FormState::Milestone(form));
    Ok(())
}

pub fn open_edit_risk(store: &mut Store, id: RiskId) -> Result<(), Notice> {
    let form = store
        .risk(id)
        .map(RiskForm::edit)
        .ok_or(Notice::NotLoaded(RecordKind::Risk))?;
    store.open_form(FormState::Risk(form));
    Ok(())
}

/// Validate the open form and plan the write.
///
/// Returns `None` when nothing should be sent: no form, a submit already in
/// flight, or a validation error (recorded on the form).
pub fn save(store: &mut Store, now: Timestamp) -> Option<Job> {
    let open = store.form.as_ref()?;
    if open.submitting {
        return None;
    }
    let planned = match &open.form {
        FormState::Project(form) => form.submit().map(Write::Project),
        FormState::Milestone(form) => form.submit(now).map(Write::Milestone),
        FormState::Risk(form) => form.submit().map(Write::Risk),
    };
    let write = match planned {
        Ok(write) => write,
        Err(err) => {
            store.set_form_error(&err);
            return None;
        }
    };
    if !store.begin_submit() {
        return None;
    }
    Some(plan_write(write, "save"))
}

fn plan_write(write: Write, label: &'static str) -> Job {
    Job::new(label).then(Step::Write(write))
}

/// Re-fetch plan once a write of `kind` has succeeded. Milestone writes also
/// re-fetch projects once, because project completion is derived from
/// milestones on the server.
pub fn refetch_after_write(store: &mut Store, kind: RecordKind) -> Option<Job> {
    let job = Job::new("refetch after write");
    match (kind, store.current_project_id()) {
        (RecordKind::Project, _) | (RecordKind::Milestone, None) => Some(job.fetch_projects(store)),
        (RecordKind::Milestone, Some(project_id)) => {
            Some(job.fetch_milestones(store, project_id).fetch_projects(store))
        }
        (RecordKind::Risk, Some(project_id)) => Some(job.fetch_risks(store, project_id)),
        (RecordKind::Risk, None) => None,
    }
}

// ============================================================================
// DELETE
// ============================================================================

pub fn request_delete(store: &mut Store, target: DeleteTarget) -> Result<(), Notice> {
    let prompt = match target {
        DeleteTarget::Project(id) => store.project(id).map(|project| {
            format!(
                "Delete project '{}'? This will also delete all associated milestones and risks.",
                project.name
            )
        }),
        DeleteTarget::Milestone(id) => store
            .milestone(id)
            .map(|milestone| format!("Delete milestone '{}'?", milestone.name)),
        DeleteTarget::Risk(id) => store
            .risk(id)
            .map(|risk| format!("Delete risk '{}'?", risk.name)),
    };
    let prompt = prompt.ok_or(Notice::NotLoaded(target.kind()))?;
    store.request_delete(target, prompt);
    Ok(())
}

/// Answer the pending prompt. Only a yes produces a job.
pub fn answer_delete(store: &mut Store, confirmed: bool) -> Option<Job> {
    let pending = store.take_pending_delete()?;
    if !confirmed {
        return None;
    }
    Some(plan_write(Write::Delete(pending.target), "delete"))
}

// ============================================================================
// SUMMARY
// ============================================================================

pub fn summarize(store: &mut Store) -> Option<Job> {
    let (ticket, project_id) = store.begin_summary()?;
    Some(Job::new("summarize").then(Step::Summarize(ticket, project_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Resource, SummaryState};
    use trackboard_core::{EditableForm, Submission};
    use trackboard_test_utils::fixtures;
    use trackboard_test_utils::MilestoneStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn now() -> Timestamp {
        fixtures::ts(2025, 5, 1)
    }

    fn store_with_project() -> Store {
        let mut store = Store::new();
        store.projects = fixtures::two_projects();
        store.set_current_project(Some(ProjectId(1)));
        store.milestones = vec![fixtures::milestone(10, 1, "Design", MilestoneStatus::Pending)];
        store
    }

    #[test]
    fn child_forms_need_a_current_project() {
        let mut store = Store::new();
        assert_eq!(
            open_create(&mut store, RecordKind::Milestone, today()),
            Err(Notice::NoCurrentProject)
        );
        assert!(store.form.is_none());
        assert!(open_create(&mut store, RecordKind::Project, today()).is_ok());
    }

    #[test]
    fn edit_of_unloaded_record_opens_nothing() {
        let mut store = store_with_project();
        assert_eq!(
            open_edit_milestone(&mut store, MilestoneId(99)),
            Err(Notice::NotLoaded(RecordKind::Milestone))
        );
        assert!(store.form.is_none());
    }

    #[test]
    fn invalid_form_records_error_and_sends_nothing() {
        let mut store = store_with_project();
        open_create(&mut store, RecordKind::Risk, today()).unwrap();
        assert!(save(&mut store, now()).is_none());
        let open = store.form.as_ref().unwrap();
        assert!(open.error.as_deref().unwrap().contains("name"));
        assert!(!open.submitting);
    }

    #[test]
    fn milestone_save_plans_only_the_write() {
        let mut store = store_with_project();
        open_edit_milestone(&mut store, MilestoneId(10)).unwrap();
        let job = save(&mut store, now()).unwrap();
        match job.steps.as_slice() {
            [Step::Write(Write::Milestone(Submission::Update(id, _)))] => {
                assert_eq!(*id, MilestoneId(10));
            }
            other => panic!("unexpected plan: {other:?}"),
        }
        assert!(save(&mut store, now()).is_none(), "second submit is ignored");
    }

    #[test]
    fn milestone_write_refetches_milestones_then_projects() {
        let mut store = store_with_project();
        let job = refetch_after_write(&mut store, RecordKind::Milestone).unwrap();
        match job.steps.as_slice() {
            [Step::FetchMilestones(_, project), Step::FetchProjects(_)] => {
                assert_eq!(*project, ProjectId(1));
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn refetch_tickets_supersede_fetches_issued_during_the_write() {
        let mut store = store_with_project();
        let during_write = store.issue(Resource::Projects);
        let job = refetch_after_write(&mut store, RecordKind::Project).unwrap();
        match job.steps.as_slice() {
            [Step::FetchProjects(ticket)] => assert!(ticket.seq > during_write.seq),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn risk_write_without_a_project_refetches_nothing() {
        let mut store = Store::new();
        assert!(refetch_after_write(&mut store, RecordKind::Risk).is_none());
        let job = refetch_after_write(&mut store, RecordKind::Milestone).unwrap();
        assert!(matches!(job.steps.as_slice(), [Step::FetchProjects(_)]));
    }

    #[test]
    fn project_save_posts_new_projects() {
        let mut store = Store::new();
        open_create(&mut store, RecordKind::Project, today()).unwrap();
        let editable = store.form.as_mut().unwrap().form.editable_mut();
        editable.set_text(0, "Mobile app".into());
        editable.set_text(1, "Sam".into());
        editable.set_text(4, "2025-12-01".into());
        let job = save(&mut store, now()).unwrap();
        assert!(matches!(
            job.steps.as_slice(),
            [Step::Write(Write::Project(Submission::Create(_)))]
        ));
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut store = store_with_project();
        request_delete(&mut store, DeleteTarget::Milestone(MilestoneId(10))).unwrap();
        assert!(store.pending_delete.as_ref().unwrap().prompt.contains("Design"));
        assert!(answer_delete(&mut store, false).is_none());
        assert!(store.pending_delete.is_none());

        request_delete(&mut store, DeleteTarget::Milestone(MilestoneId(10))).unwrap();
        let job = answer_delete(&mut store, true).unwrap();
        assert!(matches!(
            job.steps.as_slice(),
            [Step::Write(Write::Delete(DeleteTarget::Milestone(MilestoneId(10))))]
        ));
    }

    #[test]
    fn summarize_requires_current_project() {
        let mut store = Store::new();
        assert!(summarize(&mut store).is_none());
        let mut store = store_with_project();
        assert!(summarize(&mut store).is_some());
        assert_eq!(store.summary, SummaryState::Loading);
    }
}
