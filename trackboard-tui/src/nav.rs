//! Navigation and view switching utilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Dashboard,
    Projects,
    ProjectDetail,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Projects => "Projects",
            View::ProjectDetail => "Project",
        }
    }

    pub fn all() -> &'static [View] {
        &[View::Dashboard, View::Projects, View::ProjectDetail]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let all = Self::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

/// Which list has focus on the project detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Milestones,
    Risks,
}

impl Panel {
    pub fn toggle(&self) -> Panel {
        match self {
            Panel::Milestones => Panel::Risks,
            Panel::Risks => Panel::Milestones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cycle_in_both_directions() {
        assert_eq!(View::Dashboard.next(), View::Projects);
        assert_eq!(View::ProjectDetail.next(), View::Dashboard);
        assert_eq!(View::Dashboard.previous(), View::ProjectDetail);
        assert_eq!(View::from_index(3), None);
    }
}
