//! Create/edit forms for projects, milestones, and risks.
//!
//! A form is in edit mode exactly when it carries a record id. Submitting
//! validates required fields and yields a [`Submission`]: `Create` for POST,
//! `Update` for PUT keyed by the id.

use crate::dates::{self, Timestamp};
use crate::entities::{
    Milestone, MilestoneId, MilestoneInput, Project, ProjectId, ProjectInput, Risk, RiskId,
    RiskInput,
};
use crate::enums::{MilestoneStatus, ProjectStatus, RiskSeverity, RiskStatus};
use crate::error::ValidationError;
use chrono::NaiveDate;

// ============================================================================
// SUBMISSION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Submission<I, Id> {
    Create(I),
    Update(Id, I),
}

impl<I, Id: Copy> Submission<I, Id> {
    pub fn method(&self) -> &'static str {
        match self {
            Submission::Create(_) => "POST",
            Submission::Update(..) => "PUT",
        }
    }

    pub fn input(&self) -> &I {
        match self {
            Submission::Create(input) | Submission::Update(_, input) => input,
        }
    }

    pub fn id(&self) -> Option<Id> {
        match self {
            Submission::Create(_) => None,
            Submission::Update(id, _) => Some(*id),
        }
    }
}

// ============================================================================
// GENERIC FIELD ACCESS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Number,
    Choice,
}

/// A read-only snapshot of one form field, used by editors to render and
/// navigate any form without knowing its concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldView {
    fn new(label: &'static str, value: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            label,
            value: value.into(),
            kind,
            required,
        }
    }
}

pub trait EditableForm {
    fn title(&self) -> &'static str;
    fn fields(&self) -> Vec<FieldView>;
    /// Replace a text-like field. Choice fields ignore this.
    fn set_text(&mut self, index: usize, value: String);
    /// Step a choice field through its variants. Text fields ignore this.
    fn cycle_choice(&mut self, index: usize, forward: bool);
    fn is_edit(&self) -> bool;
}

/// Step through `all`. A value outside the list steps onto its first or last
/// entry.
fn cycle<T: Clone + PartialEq>(all: &[T], current: &T, forward: bool) -> T {
    let next = match (all.iter().position(|v| v == current), forward) {
        (Some(idx), true) => (idx + 1) % all.len(),
        (Some(0) | None, false) => all.len() - 1,
        (Some(idx), false) => idx - 1,
        (None, true) => 0,
    };
    all[next].clone()
}

fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::RequiredFieldMissing { field });
    }
    Ok(trimmed.to_string())
}

fn required_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = required_text(field, value)?;
    NaiveDate::parse_from_str(&trimmed, dates::FORM_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidValue {
            field,
            reason: format!("expected YYYY-MM-DD, got '{trimmed}'"),
        }
    })
}

fn percentage(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let parsed: f64 = trimmed.parse().map_err(|_| ValidationError::InvalidValue {
        field,
        reason: format!("'{trimmed}' is not a number"),
    })?;
    if !(0.0..=100.0).contains(&parsed) {
        return Err(ValidationError::InvalidValue {
            field,
            reason: "must be between 0 and 100".to_string(),
        });
    }
    Ok(parsed)
}

// ============================================================================
// PROJECT FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub id: Option<ProjectId>,
    pub name: String,
    pub owner: String,
    pub description: String,
    pub start_date: String,
    pub deadline: String,
    pub status: ProjectStatus,
    pub completion_percentage: String,
}

impl ProjectForm {
    /// Blank create form; the start date defaults to `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            id: None,
            name: String::new(),
            owner: String::new(),
            description: String::new(),
            start_date: today.format(dates::FORM_DATE_FORMAT).to_string(),
            deadline: String::new(),
            status: ProjectStatus::NotStarted,
            completion_percentage: String::new(),
        }
    }

    pub fn edit(project: &Project) -> Self {
        Self {
            id: Some(project.id),
            name: project.name.clone(),
            owner: project.owner.clone(),
            description: project.description.clone().unwrap_or_default(),
            start_date: dates::form_date(&project.start_date),
            deadline: dates::form_date(&project.deadline),
            status: project.status,
            completion_percentage: project.completion_percentage.to_string(),
        }
    }

    pub fn submit(&self) -> Result<Submission<ProjectInput, ProjectId>, ValidationError> {
        let input = ProjectInput {
            name: required_text("name", &self.name)?,
            owner: required_text("owner", &self.owner)?,
            description: self.description.trim().to_string(),
            start_date: dates::date_field_to_wire(required_date("start_date", &self.start_date)?),
            deadline: dates::date_field_to_wire(required_date("deadline", &self.deadline)?),
            status: self.status,
            completion_percentage: percentage("completion_percentage", &self.completion_percentage)?,
        };
        Ok(match self.id {
            Some(id) => Submission::Update(id, input),
            None => Submission::Create(input),
        })
    }
}

impl EditableForm for ProjectForm {
    fn title(&self) -> &'static str {
        if self.id.is_some() {
            "Edit Project"
        } else {
            "Add Project"
        }
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::new("Name", self.name.as_str(), FieldKind::Text, true),
            FieldView::new("Owner", self.owner.as_str(), FieldKind::Text, true),
            FieldView::new("Description", self.description.as_str(), FieldKind::Text, false),
            FieldView::new("Start date", self.start_date.as_str(), FieldKind::Date, true),
            FieldView::new("Deadline", self.deadline.as_str(), FieldKind::Date, true),
            FieldView::new("Status", self.status.label(), FieldKind::Choice, true),
            FieldView::new(
                "Completion %",
                self.completion_percentage.as_str(),
                FieldKind::Number,
                false,
            ),
        ]
    }

    fn set_text(&mut self, index: usize, value: String) {
        match index {
            0 => self.name = value,
            1 => self.owner = value,
            2 => self.description = value,
            3 => self.start_date = value,
            4 => self.deadline = value,
            6 => self.completion_percentage = value,
            _ => {}
        }
    }

    fn cycle_choice(&mut self, index: usize, forward: bool) {
        if index == 5 {
            self.status = cycle(&ProjectStatus::ALL, &self.status, forward);
        }
    }

    fn is_edit(&self) -> bool {
        self.id.is_some()
    }
}

// ============================================================================
// MILESTONE FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneForm {
    pub id: Option<MilestoneId>,
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub target_date: String,
    pub status: MilestoneStatus,
}

impl MilestoneForm {
    pub fn blank(project_id: ProjectId) -> Self {
        Self {
            id: None,
            project_id,
            name: String::new(),
            description: String::new(),
            target_date: String::new(),
            status: MilestoneStatus::Pending,
        }
    }

    pub fn edit(milestone: &Milestone) -> Self {
        Self {
            id: Some(milestone.id),
            project_id: milestone.project_id,
            name: milestone.name.clone(),
            description: milestone.description.clone().unwrap_or_default(),
            target_date: dates::form_date(&milestone.target_date),
            status: milestone.status,
        }
    }

    /// Validate and build the request. A milestone created as already
    /// completed is stamped with `now` as its completion date.
    pub fn submit(
        &self,
        now: Timestamp,
    ) -> Result<Submission<MilestoneInput, MilestoneId>, ValidationError> {
        let completion_date = (self.id.is_none() && self.status.is_completed())
            .then(|| dates::to_wire(&now));
        let input = MilestoneInput {
            project_id: self.project_id,
            name: required_text("name", &self.name)?,
            description: self.description.trim().to_string(),
            target_date: dates::date_field_to_wire(required_date("target_date", &self.target_date)?),
            status: self.status,
            completion_date,
        };
        Ok(match self.id {
            Some(id) => Submission::Update(id, input),
            None => Submission::Create(input),
        })
    }
}

impl EditableForm for MilestoneForm {
    fn title(&self) -> &'static str {
        if self.id.is_some() {
            "Edit Milestone"
        } else {
            "Add Milestone"
        }
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::new("Name", self.name.as_str(), FieldKind::Text, true),
            FieldView::new("Description", self.description.as_str(), FieldKind::Text, false),
            FieldView::new("Target date", self.target_date.as_str(), FieldKind::Date, true),
            FieldView::new("Status", self.status.label(), FieldKind::Choice, true),
        ]
    }

    fn set_text(&mut self, index: usize, value: String) {
        match index {
            0 => self.name = value,
            1 => self.description = value,
            2 => self.target_date = value,
            _ => {}
        }
    }

    fn cycle_choice(&mut self, index: usize, forward: bool) {
        if index == 3 {
            self.status = cycle(&MilestoneStatus::ALL, &self.status, forward);
        }
    }

    fn is_edit(&self) -> bool {
        self.id.is_some()
    }
}

// ============================================================================
// RISK FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RiskForm {
    pub id: Option<RiskId>,
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub severity: RiskSeverity,
    pub mitigation_plan: String,
    pub status: RiskStatus,
}

impl RiskForm {
    pub fn blank(project_id: ProjectId) -> Self {
        Self {
            id: None,
            project_id,
            name: String::new(),
            description: String::new(),
            severity: RiskSeverity::Low,
            mitigation_plan: String::new(),
            status: RiskStatus::Open,
        }
    }

    pub fn edit(risk: &Risk) -> Self {
        Self {
            id: Some(risk.id),
            project_id: risk.project_id,
            name: risk.name.clone(),
            description: risk.description.clone().unwrap_or_default(),
            severity: risk.severity,
            mitigation_plan: risk.mitigation_plan.clone().unwrap_or_default(),
            status: risk.status.clone(),
        }
    }

    pub fn submit(&self) -> Result<Submission<RiskInput, RiskId>, ValidationError> {
        let input = RiskInput {
            project_id: self.project_id,
            name: required_text("name", &self.name)?,
            description: self.description.trim().to_string(),
            severity: self.severity,
            mitigation_plan: self.mitigation_plan.trim().to_string(),
            status: self.status.clone(),
        };
        Ok(match self.id {
            Some(id) => Submission::Update(id, input),
            None => Submission::Create(input),
        })
    }
}

impl EditableForm for RiskForm {
    fn title(&self) -> &'static str {
        if self.id.is_some() {
            "Edit Risk"
        } else {
            "Add Risk"
        }
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView::new("Name", self.name.as_str(), FieldKind::Text, true),
            FieldView::new("Description", self.description.as_str(), FieldKind::Text, false),
            FieldView::new("Severity", self.severity.label(), FieldKind::Choice, true),
            FieldView::new("Mitigation plan", self.mitigation_plan.as_str(), FieldKind::Text, false),
            FieldView::new("Status", self.status.label(), FieldKind::Choice, true),
        ]
    }

    fn set_text(&mut self, index: usize, value: String) {
        match index {
            0 => self.name = value,
            1 => self.description = value,
            3 => self.mitigation_plan = value,
            _ => {}
        }
    }

    fn cycle_choice(&mut self, index: usize, forward: bool) {
        match index {
            2 => self.severity = cycle(&RiskSeverity::ALL, &self.severity, forward),
            4 => self.status = cycle(&RiskStatus::ALL, &self.status, forward),
            _ => {}
        }
    }

    fn is_edit(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn filled_project_form() -> ProjectForm {
        let mut form = ProjectForm::blank(today());
        form.name = "Data platform".into();
        form.owner = "Ravi".into();
        form.deadline = "2025-09-30".into();
        form
    }

    #[test]
    fn blank_project_form_creates() {
        let submission = filled_project_form().submit().unwrap();
        assert_eq!(submission.method(), "POST");
        assert_eq!(submission.id(), None);
        let input = submission.input();
        assert_eq!(input.start_date, "2025-05-01T00:00:00");
        assert_eq!(input.deadline, "2025-09-30T00:00:00");
        assert_eq!(input.completion_percentage, 0.0);
    }

    #[test]
    fn form_with_id_updates_that_id() {
        let mut form = filled_project_form();
        form.id = Some(ProjectId(12));
        let submission = form.submit().unwrap();
        assert_eq!(submission.method(), "PUT");
        assert_eq!(submission.id(), Some(ProjectId(12)));
    }

    #[test]
    fn missing_required_fields_are_reported_in_order() {
        let form = ProjectForm::blank(today());
        assert_eq!(
            form.submit().unwrap_err(),
            ValidationError::RequiredFieldMissing { field: "name" }
        );
        let mut form = filled_project_form();
        form.owner = "   ".into();
        assert_eq!(form.submit().unwrap_err().field(), "owner");
    }

    #[test]
    fn rejects_bad_dates_and_percentages() {
        let mut form = filled_project_form();
        form.deadline = "30/09/2025".into();
        assert!(matches!(
            form.submit(),
            Err(ValidationError::InvalidValue { field: "deadline", .. })
        ));

        let mut form = filled_project_form();
        form.completion_percentage = "140".into();
        assert!(matches!(
            form.submit(),
            Err(ValidationError::InvalidValue { field: "completion_percentage", .. })
        ));
    }

    #[test]
    fn completed_milestone_on_create_gets_completion_date() {
        let now = today().and_time(NaiveTime::from_hms_opt(14, 5, 0).unwrap());
        let mut form = MilestoneForm::blank(ProjectId(1));
        form.name = "Launch".into();
        form.target_date = "2025-05-20".into();
        form.status = MilestoneStatus::Completed;
        let submission = form.submit(now).unwrap();
        assert_eq!(
            submission.input().completion_date.as_deref(),
            Some("2025-05-01T14:05:00")
        );

        form.id = Some(MilestoneId(5));
        let submission = form.submit(now).unwrap();
        assert!(submission.input().completion_date.is_none());
    }

    #[test]
    fn choice_fields_cycle_both_ways() {
        let mut form = RiskForm::blank(ProjectId(1));
        form.cycle_choice(2, true);
        assert_eq!(form.severity, RiskSeverity::Medium);
        form.cycle_choice(2, false);
        form.cycle_choice(2, false);
        assert_eq!(form.severity, RiskSeverity::High);
        form.cycle_choice(4, true);
        assert_eq!(form.status, RiskStatus::Mitigated);
    }

    #[test]
    fn editing_a_risk_keeps_an_unknown_status() {
        let risk: Risk = serde_json::from_str(
            r#"{"id": 7, "project_id": 1, "name": "Vendor churn", "status": "Escalated"}"#,
        )
        .unwrap();
        let mut form = RiskForm::edit(&risk);
        assert_eq!(form.fields()[4].value, "Escalated");

        let submission = form.submit().unwrap();
        assert_eq!(submission.input().status, RiskStatus::Other("Escalated".into()));
        let body = serde_json::to_value(submission.input()).unwrap();
        assert_eq!(body["status"], "Escalated");

        form.cycle_choice(4, true);
        assert_eq!(form.status, RiskStatus::Open);
    }

    #[test]
    fn set_text_ignores_choice_fields() {
        let mut form = ProjectForm::blank(today());
        form.set_text(5, "COMPLETED".into());
        assert_eq!(form.status, ProjectStatus::NotStarted);
        form.set_text(0, "Renamed".into());
        assert_eq!(form.fields()[0].value, "Renamed");
    }

    #[test]
    fn titles_follow_mode() {
        let mut form = RiskForm::blank(ProjectId(2));
        assert_eq!(form.title(), "Add Risk");
        assert!(!form.is_edit());
        form.id = Some(RiskId(3));
        assert_eq!(form.title(), "Edit Risk");
    }
}
