//! Application state: the store plus cursor, modal, and editor state.

use crate::config::TuiConfig;
use crate::controller::{self, dashboard, workspace, Job};
use crate::events::TuiEvent;
use crate::keys::{map_confirm_key, map_form_key, map_key, Action, FormKey};
use crate::nav::{Panel, View};
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::store::{DeleteTarget, Outcome, RecordKind, Store, Update};
use crate::theme::{Theme, ThemeName};
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::style::Style;
use std::sync::Arc;
use tokio::sync::mpsc;
use trackboard_core::forms::{EditableForm, FieldKind};
use trackboard_core::{Project, Timestamp, TrackerApi};
use tui_textarea::TextArea;

const NOTIFICATION_LIMIT: usize = 50;

/// Local wall-clock time, matching the naive timestamps the server stores.
pub fn now() -> Timestamp {
    chrono::Local::now().naive_local()
}

// ============================================================================
// FORM EDITOR
// ============================================================================

/// Text inputs for the open form. Choice fields have no input.
pub struct FormEditor {
    pub focus: usize,
    inputs: Vec<Option<TextArea<'static>>>,
}

impl FormEditor {
    pub fn new(form: &dyn EditableForm) -> Self {
        let inputs = form
            .fields()
            .into_iter()
            .map(|field| match field.kind {
                FieldKind::Choice => None,
                FieldKind::Text | FieldKind::Date | FieldKind::Number => {
                    let mut input = TextArea::new(vec![field.value]);
                    input.set_cursor_line_style(Style::default());
                    input.move_cursor(tui_textarea::CursorMove::End);
                    Some(input)
                }
            })
            .collect();
        Self { focus: 0, inputs }
    }

    pub fn input(&self, index: usize) -> Option<&TextArea<'static>> {
        self.inputs.get(index).and_then(Option::as_ref)
    }

    fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    fn focus_previous(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = if self.focus == 0 {
                self.inputs.len() - 1
            } else {
                self.focus - 1
            };
        }
    }

    /// Feed a key to the focused input. Returns its new text when it has one.
    fn edit(&mut self, key: KeyEvent) -> Option<String> {
        let input = self.inputs.get_mut(self.focus)?.as_mut()?;
        input.input(key);
        Some(input.lines().join(" "))
    }
}

// ============================================================================
// APP
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub dashboard: usize,
    pub projects: usize,
    pub milestones: usize,
    pub risks: usize,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    pub api: Arc<dyn TrackerApi>,
    pub store: Store,
    pub active_view: View,
    pub panel: Panel,
    pub selection: Selection,
    pub editor: Option<FormEditor>,
    pub show_help: bool,
    pub notifications: Vec<Notification>,
    sender: mpsc::Sender<TuiEvent>,
}

impl App {
    pub fn new(config: TuiConfig, api: Arc<dyn TrackerApi>, sender: mpsc::Sender<TuiEvent>) -> Self {
        let theme = Theme::from_name(config.theme_name().unwrap_or(ThemeName::Slate));
        Self {
            config,
            theme,
            api,
            store: Store::new(),
            active_view: View::Dashboard,
            panel: Panel::default(),
            selection: Selection::default(),
            editor: None,
            show_help: false,
            notifications: Vec::new(),
            sender,
        }
    }

    pub fn restore(&mut self, state: PersistedState) {
        self.active_view = state.active_view;
        self.store.set_current_project(state.current_project_id);
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            active_view: self.active_view,
            current_project_id: self.store.current_project_id(),
        }
    }

    /// Initial dashboard load plus the restored project's children.
    pub fn start(&mut self) {
        self.refresh_dashboard();
        if let Some(job) = workspace::load_children(&mut self.store) {
            self.dispatch(job);
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        if self.notifications.len() > NOTIFICATION_LIMIT {
            self.notifications.remove(0);
        }
    }

    fn dispatch(&self, job: Job) {
        controller::spawn(Arc::clone(&self.api), job, self.sender.clone());
    }

    pub fn refresh_dashboard(&mut self) {
        let job = dashboard::plan_refresh(&mut self.store);
        self.dispatch(job);
    }

    /// Projects shown in the dashboard table, in table order.
    pub fn dashboard_projects(&self) -> &[Project] {
        let limit = self.config.dashboard_table_limit.min(self.store.projects.len());
        &self.store.projects[..limit]
    }

    /// Handle one loop event. Returns true when the app should quit.
    pub fn handle_event(&mut self, event: TuiEvent) -> bool {
        match event {
            TuiEvent::Input(key) => {
                if key.kind == KeyEventKind::Press {
                    return self.handle_key(key);
                }
            }
            TuiEvent::Update(update) => self.apply_update(update),
            TuiEvent::Tick => self.refresh_dashboard(),
            TuiEvent::Resize { .. } => {}
        }
        false
    }

    pub fn apply_update(&mut self, update: Update) {
        let deleted = matches!(update, Update::Deleted(_, Ok(())));
        let written = update.written();
        match self.store.apply(update) {
            Outcome::FormClosed => {
                self.editor = None;
                self.notify(NotificationLevel::Success, "Saved");
            }
            Outcome::Applied if deleted => self.notify(NotificationLevel::Success, "Deleted"),
            Outcome::Alerted => {
                if let Some(alert) = self.store.alert.clone() {
                    self.notify(NotificationLevel::Error, alert);
                }
            }
            Outcome::Applied | Outcome::Stale | Outcome::Swallowed => {}
        }
        if let Some(kind) = written {
            if let Some(job) = workspace::refetch_after_write(&mut self.store, kind) {
                self.dispatch(job);
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let clamp = |index: &mut usize, len: usize| {
            *index = (*index).min(len.saturating_sub(1));
        };
        let dashboard_len = self.dashboard_projects().len();
        clamp(&mut self.selection.dashboard, dashboard_len);
        clamp(&mut self.selection.projects, self.store.projects.len());
        clamp(&mut self.selection.milestones, self.store.milestones.len());
        clamp(&mut self.selection.risks, self.store.risks.len());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.store.alert.is_some() {
            self.store.dismiss_alert();
            return false;
        }
        if self.store.pending_delete.is_some() {
            if let Some(confirmed) = map_confirm_key(key) {
                if let Some(job) = workspace::answer_delete(&mut self.store, confirmed) {
                    self.dispatch(job);
                }
            }
            return false;
        }
        if self.store.form.is_some() {
            self.handle_form_key(key);
            return false;
        }
        if self.show_help {
            self.show_help = false;
            return false;
        }
        match map_key(key) {
            Some(action) => self.handle_action(action),
            None => false,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let (Some(open), Some(editor)) = (self.store.form.as_mut(), self.editor.as_mut()) else {
            return;
        };
        let focus_kind = open
            .form
            .editable()
            .fields()
            .get(editor.focus)
            .map(|field| field.kind);
        match map_form_key(key) {
            FormKey::NextField => editor.focus_next(),
            FormKey::PrevField => editor.focus_previous(),
            FormKey::Left | FormKey::Right if focus_kind == Some(FieldKind::Choice) => {
                let forward = map_form_key(key) == FormKey::Right;
                open.form.editable_mut().cycle_choice(editor.focus, forward);
            }
            FormKey::Left | FormKey::Right | FormKey::Edit(_) => {
                if let Some(text) = editor.edit(key) {
                    open.form.editable_mut().set_text(editor.focus, text);
                }
            }
            FormKey::Cancel => {
                self.store.close_form();
                self.editor = None;
            }
            FormKey::Submit => {
                if let Some(job) = workspace::save(&mut self.store, now()) {
                    self.dispatch(job);
                }
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::NextView => self.active_view = self.active_view.next(),
            Action::PrevView => self.active_view = self.active_view.previous(),
            Action::SwitchView(index) => {
                if let Some(view) = View::from_index(index) {
                    self.active_view = view;
                }
            }
            Action::MoveDown => self.move_selection(1),
            Action::MoveUp => self.move_selection(-1),
            Action::FocusLeft | Action::FocusRight => {
                if self.active_view == View::ProjectDetail {
                    self.panel = self.panel.toggle();
                }
            }
            Action::Open => self.open_selected(),
            Action::NewItem => self.open_create(),
            Action::EditItem => self.open_edit(),
            Action::DeleteItem => self.request_delete(),
            Action::Refresh => self.refresh_active_view(),
            Action::ExportCsv => match dashboard::export_csv(self.api.as_ref()) {
                Ok(url) => self.notify(NotificationLevel::Info, format!("Opening {url}")),
                Err(err) => {
                    tracing::warn!(error = %err, "Export failed");
                    self.notify(NotificationLevel::Error, format!("Export failed: {err}"));
                }
            },
            Action::Summarize => match workspace::summarize(&mut self.store) {
                Some(job) => self.dispatch(job),
                None => self.notify(
                    NotificationLevel::Warning,
                    workspace::Notice::NoCurrentProject.to_string(),
                ),
            },
            Action::OpenHelp => self.show_help = true,
        }
        false
    }

    fn move_selection(&mut self, delta: isize) {
        let dashboard_len = self.dashboard_projects().len();
        let (index, len) = match (self.active_view, self.panel) {
            (View::Dashboard, _) => (&mut self.selection.dashboard, dashboard_len),
            (View::Projects, _) => (&mut self.selection.projects, self.store.projects.len()),
            (View::ProjectDetail, Panel::Milestones) => {
                (&mut self.selection.milestones, self.store.milestones.len())
            }
            (View::ProjectDetail, Panel::Risks) => {
                (&mut self.selection.risks, self.store.risks.len())
            }
        };
        if len == 0 {
            *index = 0;
            return;
        }
        *index = index.saturating_add_signed(delta).min(len - 1);
    }

    /// The project under the cursor on the dashboard or projects view.
    pub fn selected_project(&self) -> Option<&Project> {
        match self.active_view {
            View::Dashboard => self.dashboard_projects().get(self.selection.dashboard),
            View::Projects => self.store.projects.get(self.selection.projects),
            View::ProjectDetail => self.store.current_project(),
        }
    }

    fn open_selected(&mut self) {
        if self.active_view == View::ProjectDetail {
            return;
        }
        let Some(project_id) = self.selected_project().map(|p| p.id) else {
            return;
        };
        let job = workspace::view_project(&mut self.store, project_id);
        self.dispatch(job);
        self.selection.milestones = 0;
        self.selection.risks = 0;
        self.active_view = View::ProjectDetail;
    }

    fn focused_kind(&self) -> RecordKind {
        match (self.active_view, self.panel) {
            (View::ProjectDetail, Panel::Milestones) => RecordKind::Milestone,
            (View::ProjectDetail, Panel::Risks) => RecordKind::Risk,
            _ => RecordKind::Project,
        }
    }

    fn selected_target(&self) -> Option<DeleteTarget> {
        match self.focused_kind() {
            RecordKind::Project => self.selected_project().map(|p| DeleteTarget::Project(p.id)),
            RecordKind::Milestone => self
                .store
                .milestones
                .get(self.selection.milestones)
                .map(|m| DeleteTarget::Milestone(m.id)),
            RecordKind::Risk => self
                .store
                .risks
                .get(self.selection.risks)
                .map(|r| DeleteTarget::Risk(r.id)),
        }
    }

    fn open_create(&mut self) {
        let kind = self.focused_kind();
        let result = workspace::open_create(&mut self.store, kind, now().date());
        self.after_form_request(result);
    }

    fn open_edit(&mut self) {
        let result = match self.selected_target() {
            Some(DeleteTarget::Project(id)) => workspace::open_edit_project(&mut self.store, id),
            Some(DeleteTarget::Milestone(id)) => workspace::open_edit_milestone(&mut self.store, id),
            Some(DeleteTarget::Risk(id)) => workspace::open_edit_risk(&mut self.store, id),
            None => return,
        };
        self.after_form_request(result);
    }

    fn after_form_request(&mut self, result: Result<(), workspace::Notice>) {
        match result {
            Ok(()) => {
                self.editor = self
                    .store
                    .form
                    .as_ref()
                    .map(|open| FormEditor::new(open.form.editable()));
            }
            Err(notice) => self.notify(NotificationLevel::Warning, notice.to_string()),
        }
    }

    fn request_delete(&mut self) {
        let Some(target) = self.selected_target() else {
            return;
        };
        if let Err(notice) = workspace::request_delete(&mut self.store, target) {
            self.notify(NotificationLevel::Warning, notice.to_string());
        }
    }

    fn refresh_active_view(&mut self) {
        match self.active_view {
            View::Dashboard => self.refresh_dashboard(),
            View::Projects => {
                let job = workspace::load_projects(&mut self.store);
                self.dispatch(job);
            }
            View::ProjectDetail => match workspace::load_children(&mut self.store) {
                Some(job) => self.dispatch(job),
                None => self.notify(
                    NotificationLevel::Warning,
                    workspace::Notice::NoCurrentProject.to_string(),
                ),
            },
        }
    }
}
