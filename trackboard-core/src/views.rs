//! Declarative view models derived from fetched records.
//!
//! Everything here is a pure function of `(records, now)`. Renderers only
//! draw what these produce; they never inspect raw records for styling.

use crate::dates::{self, Timestamp};
use crate::entities::{Milestone, MilestoneId, Project, ProjectId, Risk, RiskId};
use crate::enums::{ProjectStatus, Tone};

// ============================================================================
// SHARED PIECES
// ============================================================================

/// Shown in place of an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub message: &'static str,
    pub call_to_action: Option<&'static str>,
}

/// A list that is either rows or an explicit empty-state placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Empty(Placeholder),
    Rows(Vec<T>),
}

impl<T> Listing<T> {
    fn from_rows(rows: Vec<T>, placeholder: Placeholder) -> Self {
        if rows.is_empty() {
            Listing::Empty(placeholder)
        } else {
            Listing::Rows(rows)
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            Listing::Empty(_) => &[],
            Listing::Rows(rows) => rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

/// A status or severity marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub class: String,
    pub tone: Tone,
}

impl From<ProjectStatus> for Badge {
    fn from(status: ProjectStatus) -> Self {
        Badge {
            label: status.label(),
            class: status.style_class(),
            tone: status.tone(),
        }
    }
}

macro_rules! badge_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Badge {
            fn from(value: $ty) -> Self {
                Badge {
                    label: value.label(),
                    class: value.style_class(),
                    tone: value.tone(),
                }
            }
        })*
    };
}

badge_from!(
    crate::enums::MilestoneStatus,
    crate::enums::RiskSeverity,
    crate::enums::RiskStatus
);

/// Colour band of a completion value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionBand {
    Good,
    Warning,
    Risk,
}

impl CompletionBand {
    pub fn from_percentage(value: f64) -> Self {
        if value >= 80.0 {
            CompletionBand::Good
        } else if value >= 50.0 {
            CompletionBand::Warning
        } else {
            CompletionBand::Risk
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            CompletionBand::Good => Tone::Success,
            CompletionBand::Warning => Tone::Warning,
            CompletionBand::Risk => Tone::Danger,
        }
    }
}

/// A completion value ready to draw as a progress bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub value: f64,
    pub label: String,
    pub band: CompletionBand,
}

impl Progress {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            label: format_percent(value),
            band: CompletionBand::from_percentage(value),
        }
    }

    /// Value clamped into `0.0..=1.0` for gauge widgets.
    pub fn ratio(&self) -> f64 {
        (self.value / 100.0).clamp(0.0, 1.0)
    }
}

/// A due date with its overdue flag resolved against `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDate {
    pub text: String,
    pub overdue: bool,
}

/// True when `due` has passed and the record is not completed.
pub fn is_overdue(due: &Timestamp, completed: bool, now: &Timestamp) -> bool {
    !completed && due < now
}

fn due_date(due: &Timestamp, completed: bool, now: &Timestamp) -> DueDate {
    DueDate {
        text: dates::display_date(due),
        overdue: is_overdue(due, completed, now),
    }
}

/// `65%` for whole numbers, `42.5%` otherwise.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value:.1}%")
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StatusSlice {
    pub status: ProjectStatus,
    pub count: usize,
    /// Share of all projects, in percent.
    pub share: f64,
}

impl StatusSlice {
    pub fn label(&self) -> String {
        self.status.label()
    }
}

/// Project counts per status, in order of first appearance.
pub fn status_distribution(projects: &[Project]) -> Vec<StatusSlice> {
    let mut slices: Vec<StatusSlice> = Vec::new();
    for project in projects {
        match slices.iter_mut().find(|slice| slice.status == project.status) {
            Some(slice) => slice.count += 1,
            None => slices.push(StatusSlice {
                status: project.status,
                count: 1,
                share: 0.0,
            }),
        }
    }
    let total = projects.len() as f64;
    for slice in &mut slices {
        slice.share = slice.count as f64 * 100.0 / total;
    }
    slices
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionBar {
    pub project_id: ProjectId,
    pub name: String,
    pub progress: Progress,
}

pub fn completion_bars(projects: &[Project]) -> Vec<CompletionBar> {
    projects
        .iter()
        .map(|project| CompletionBar {
            project_id: project.id,
            name: project.name.clone(),
            progress: Progress::new(project.completion_percentage),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub project_id: ProjectId,
    pub name: String,
    pub owner: String,
    pub status: Badge,
    pub progress: Progress,
    pub deadline: DueDate,
}

const NO_PROJECTS_FOUND: Placeholder = Placeholder {
    message: "No projects found.",
    call_to_action: Some("Add a project"),
};

/// The recent-projects table: the first `limit` projects in server order.
pub fn dashboard_table(projects: &[Project], limit: usize, now: &Timestamp) -> Listing<DashboardRow> {
    let rows = projects
        .iter()
        .take(limit)
        .map(|project| DashboardRow {
            project_id: project.id,
            name: project.name.clone(),
            owner: project.owner.clone(),
            status: project.status.into(),
            progress: Progress::new(project.completion_percentage),
            deadline: due_date(&project.deadline, project.status.is_completed(), now),
        })
        .collect();
    Listing::from_rows(rows, NO_PROJECTS_FOUND)
}

// ============================================================================
// PROJECT WORKSPACE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub project_id: ProjectId,
    pub name: String,
    pub owner: String,
    pub description: String,
    pub status: Badge,
    pub progress: Progress,
    pub start_date: String,
    pub deadline: DueDate,
}

const NO_PROJECTS_YET: Placeholder = Placeholder {
    message: "No projects yet",
    call_to_action: Some("Get started by adding your first project!"),
};

const NO_DESCRIPTION: &str = "No description";

fn description_or_default(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string()
}

pub fn project_cards(projects: &[Project], now: &Timestamp) -> Listing<ProjectCard> {
    let cards = projects
        .iter()
        .map(|project| ProjectCard {
            project_id: project.id,
            name: project.name.clone(),
            owner: project.owner.clone(),
            description: description_or_default(&project.description),
            status: project.status.into(),
            progress: Progress::new(project.completion_percentage),
            start_date: dates::display_date(&project.start_date),
            deadline: due_date(&project.deadline, project.status.is_completed(), now),
        })
        .collect();
    Listing::from_rows(cards, NO_PROJECTS_YET)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneItem {
    pub milestone_id: MilestoneId,
    pub name: String,
    pub description: String,
    pub status: Badge,
    pub target: DueDate,
    pub completed_on: Option<String>,
}

const NO_MILESTONES: Placeholder = Placeholder {
    message: "No milestones yet. Add one to get started!",
    call_to_action: None,
};

pub fn milestone_items(milestones: &[Milestone], now: &Timestamp) -> Listing<MilestoneItem> {
    let items = milestones
        .iter()
        .map(|milestone| MilestoneItem {
            milestone_id: milestone.id,
            name: milestone.name.clone(),
            description: description_or_default(&milestone.description),
            status: milestone.status.into(),
            target: due_date(&milestone.target_date, milestone.status.is_completed(), now),
            completed_on: milestone.completion_date.as_ref().map(dates::display_date),
        })
        .collect();
    Listing::from_rows(items, NO_MILESTONES)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskItem {
    pub risk_id: RiskId,
    pub name: String,
    pub description: String,
    pub severity: Badge,
    pub status: Badge,
    pub mitigation_plan: Option<String>,
}

const NO_RISKS: Placeholder = Placeholder {
    message: "No risks logged yet. Add one to track potential issues!",
    call_to_action: None,
};

pub fn risk_items(risks: &[Risk]) -> Listing<RiskItem> {
    let items = risks
        .iter()
        .map(|risk| RiskItem {
            risk_id: risk.id,
            name: risk.name.clone(),
            description: description_or_default(&risk.description),
            severity: risk.severity.into(),
            status: risk.status.clone().into(),
            mitigation_plan: risk
                .mitigation_plan
                .as_deref()
                .map(str::trim)
                .filter(|plan| !plan.is_empty())
                .map(str::to_string),
        })
        .collect();
    Listing::from_rows(items, NO_RISKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{MilestoneStatus, RiskSeverity, RiskStatus};
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn project(id: i64, status: ProjectStatus, completion: f64, deadline: Timestamp) -> Project {
        Project {
            id: ProjectId(id),
            name: format!("Project {id}"),
            owner: "Kim".into(),
            description: None,
            start_date: ts(2025, 1, 1),
            deadline,
            status,
            completion_percentage: completion,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn band_thresholds_are_inclusive() {
        assert_eq!(CompletionBand::from_percentage(80.0), CompletionBand::Good);
        assert_eq!(CompletionBand::from_percentage(79.0), CompletionBand::Warning);
        assert_eq!(CompletionBand::from_percentage(50.0), CompletionBand::Warning);
        assert_eq!(CompletionBand::from_percentage(49.0), CompletionBand::Risk);
        assert_eq!(CompletionBand::from_percentage(0.0), CompletionBand::Risk);
    }

    #[test]
    fn two_project_dashboard() {
        let now = ts(2025, 6, 1);
        let projects = vec![
            project(1, ProjectStatus::InProgress, 65.0, ts(2025, 9, 1)),
            project(2, ProjectStatus::Completed, 100.0, ts(2025, 3, 1)),
        ];

        let slices = status_distribution(&projects);
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|slice| slice.count == 1 && slice.share == 50.0));

        let bars = completion_bars(&projects);
        assert_eq!(bars[0].progress.band, CompletionBand::Warning);
        assert_eq!(bars[1].progress.band, CompletionBand::Good);

        let table = dashboard_table(&projects, 10, &now);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].progress.label, "65%");
        assert_eq!(table.rows()[0].status.class, "status-in-progress");
        // completed projects are never overdue
        assert!(!table.rows()[1].deadline.overdue);
    }

    #[test]
    fn distribution_keeps_first_appearance_order() {
        let due = ts(2025, 9, 1);
        let projects = vec![
            project(1, ProjectStatus::AtRisk, 10.0, due),
            project(2, ProjectStatus::InProgress, 10.0, due),
            project(3, ProjectStatus::AtRisk, 10.0, due),
        ];
        let slices = status_distribution(&projects);
        assert_eq!(slices[0].status, ProjectStatus::AtRisk);
        assert_eq!(slices[0].count, 2);
        assert_eq!(slices[1].status, ProjectStatus::InProgress);
    }

    #[test]
    fn table_truncates_to_limit() {
        let due = ts(2025, 9, 1);
        let projects: Vec<_> = (1..=12)
            .map(|id| project(id, ProjectStatus::InProgress, 20.0, due))
            .collect();
        let table = dashboard_table(&projects, 10, &ts(2025, 1, 1));
        assert_eq!(table.len(), 10);
        assert_eq!(table.rows()[9].project_id, ProjectId(10));
    }

    #[test]
    fn empty_lists_yield_placeholders() {
        let now = ts(2025, 1, 1);
        match dashboard_table(&[], 10, &now) {
            Listing::Empty(placeholder) => {
                assert_eq!(placeholder.message, "No projects found.");
                assert_eq!(placeholder.call_to_action, Some("Add a project"));
            }
            Listing::Rows(_) => panic!("expected placeholder"),
        }
        assert!(matches!(project_cards(&[], &now), Listing::Empty(p) if p.message == "No projects yet"));
        assert!(milestone_items(&[], &now).is_empty());
        assert!(matches!(risk_items(&[]), Listing::Empty(p) if p.call_to_action.is_none()));
    }

    #[test]
    fn past_deadline_is_overdue_unless_completed() {
        let now = ts(2025, 6, 1);
        let late = project(1, ProjectStatus::OnHold, 30.0, ts(2025, 5, 1));
        let cards = project_cards(&[late], &now);
        assert!(cards.rows()[0].deadline.overdue);
        assert_eq!(cards.rows()[0].description, "No description");

        let milestone = Milestone {
            id: MilestoneId(1),
            project_id: ProjectId(1),
            name: "Design".into(),
            description: Some("Wireframes".into()),
            target_date: ts(2025, 5, 1),
            status: MilestoneStatus::Completed,
            completion_date: Some(ts(2025, 4, 28)),
        };
        let items = milestone_items(&[milestone], &now);
        assert!(!items.rows()[0].target.overdue);
        assert_eq!(items.rows()[0].completed_on.as_deref(), Some("2025-04-28"));
    }

    #[test]
    fn risk_items_carry_badges_and_plan() {
        let risk = Risk {
            id: RiskId(4),
            project_id: ProjectId(1),
            name: "Vendor delay".into(),
            description: None,
            severity: RiskSeverity::High,
            mitigation_plan: Some("  ".into()),
            status: RiskStatus::Open,
        };
        let items = risk_items(&[risk]);
        let item = &items.rows()[0];
        assert_eq!(item.severity.class, "risk-high");
        assert_eq!(item.severity.tone, Tone::Danger);
        assert_eq!(item.status.label, "Open");
        assert!(item.mitigation_plan.is_none());
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(65.0), "65%");
        assert_eq!(format_percent(42.5), "42.5%");
        assert_eq!(format_percent(33.333), "33.3%");
    }
}
