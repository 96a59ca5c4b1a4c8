use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use trackboard_core::{EditableForm, MilestoneId, ProjectId, RiskId, Timestamp, TrackerApi};
use trackboard_test_utils::fixtures::{self, seeded_tracker};
use trackboard_test_utils::{ApiCall, ApiError, Endpoint, InMemoryTracker};
use trackboard_tui::config::{ThemeConfig, TuiConfig};
use trackboard_tui::controller::{self, dashboard, workspace, Job};
use trackboard_tui::events::TuiEvent;
use trackboard_tui::nav::View;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use trackboard_tui::state::App;
use trackboard_tui::store::{DeleteTarget, Outcome, RecordKind, Store, SummaryState};
use trackboard_tui::views::render_view;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

fn now() -> Timestamp {
    fixtures::ts(2025, 5, 1)
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "boom".to_string(),
    }
}

/// Run a job against the tracker and apply every update it posts, following
/// each successful write with its re-fetch job the way the app does.
async fn drive(store: &mut Store, tracker: &InMemoryTracker, job: Job) -> Vec<Outcome> {
    let api: Arc<dyn TrackerApi> = Arc::new(tracker.clone());
    let mut queue = vec![job];
    let mut outcomes = Vec::new();
    while !queue.is_empty() {
        let job = queue.remove(0);
        let (tx, mut rx) = mpsc::channel(64);
        controller::run(Arc::clone(&api), job, tx).await;
        while let Some(event) = rx.recv().await {
            if let TuiEvent::Update(update) = event {
                let written = update.written();
                outcomes.push(store.apply(update));
                if let Some(kind) = written {
                    queue.extend(workspace::refetch_after_write(store, kind));
                }
            }
        }
    }
    outcomes
}

async fn loaded_store(tracker: &InMemoryTracker) -> Store {
    let mut store = Store::new();
    let job = dashboard::plan_refresh(&mut store);
    drive(&mut store, tracker, job).await;
    let job = workspace::view_project(&mut store, ProjectId(1));
    drive(&mut store, tracker, job).await;
    tracker.clear_calls();
    store
}

#[tokio::test]
async fn dashboard_refresh_loads_kpis_then_projects() {
    let tracker = seeded_tracker();
    let mut store = Store::new();
    let job = dashboard::plan_refresh(&mut store);
    let outcomes = drive(&mut store, &tracker, job).await;

    assert_eq!(outcomes, vec![Outcome::Applied, Outcome::Applied]);
    assert_eq!(tracker.calls(), vec![ApiCall::FetchKpis, ApiCall::ListProjects]);
    assert_eq!(store.kpis, Some(fixtures::sample_kpis()));
    assert_eq!(store.projects.len(), 2);
}

#[tokio::test]
async fn failed_kpi_fetch_stops_the_job_and_keeps_old_data() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;
    tracker.fail(Endpoint::Kpis, server_error());

    let job = dashboard::plan_refresh(&mut store);
    let outcomes = drive(&mut store, &tracker, job).await;

    assert_eq!(outcomes, vec![Outcome::Swallowed]);
    assert_eq!(tracker.count(Endpoint::ListProjects), 0);
    assert_eq!(store.kpis, Some(fixtures::sample_kpis()));
    assert!(store.alert.is_none());
}

#[tokio::test]
async fn new_project_is_posted_and_edit_is_put() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;

    workspace::open_create(&mut store, RecordKind::Project, today()).unwrap();
    {
        let form = store.form.as_mut().unwrap().form.editable_mut();
        form.set_text(0, "Mobile app".into());
        form.set_text(1, "Sam".into());
        form.set_text(4, "2025-12-01".into());
    }
    let job = workspace::save(&mut store, now()).unwrap();
    let outcomes = drive(&mut store, &tracker, job).await;
    assert_eq!(outcomes[0], Outcome::FormClosed);
    assert!(store.form.is_none());
    assert!(store.projects.iter().any(|p| p.name == "Mobile app"));

    workspace::open_edit_project(&mut store, ProjectId(2)).unwrap();
    store
        .form
        .as_mut()
        .unwrap()
        .form
        .editable_mut()
        .set_text(0, "Billing cutover".into());
    let job = workspace::save(&mut store, now()).unwrap();
    drive(&mut store, &tracker, job).await;

    let calls = tracker.calls();
    assert!(matches!(calls[0], ApiCall::CreateProject(_)));
    assert_eq!(calls[0].method(), "POST");
    assert!(matches!(calls[2], ApiCall::UpdateProject(ProjectId(2), _)));
    assert_eq!(calls[2].method(), "PUT");
    assert_eq!(store.project(ProjectId(2)).unwrap().name, "Billing cutover");
}

fn fill_new_project(store: &mut Store, name: &str) {
    workspace::open_create(store, RecordKind::Project, today()).unwrap();
    let form = store.form.as_mut().unwrap().form.editable_mut();
    form.set_text(0, name.into());
    form.set_text(1, "Sam".into());
    form.set_text(4, "2025-12-01".into());
}

#[tokio::test]
async fn tick_refresh_during_a_save_does_not_hide_the_new_record() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;

    fill_new_project(&mut store, "Mobile app");
    let save = workspace::save(&mut store, now()).unwrap();
    let tick = dashboard::plan_refresh(&mut store);

    let outcomes = drive(&mut store, &tracker, tick).await;
    assert_eq!(outcomes, vec![Outcome::Applied, Outcome::Applied]);
    assert_eq!(store.projects.len(), 2);

    let outcomes = drive(&mut store, &tracker, save).await;
    assert_eq!(outcomes, vec![Outcome::FormClosed, Outcome::Applied]);
    assert_eq!(store.projects.len(), 3);
    assert!(store.projects.iter().any(|p| p.name == "Mobile app"));
}

#[tokio::test]
async fn failed_write_does_not_invalidate_a_concurrent_fetch() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;
    tracker.fail(Endpoint::WriteProject, server_error());

    let refresh = dashboard::plan_refresh(&mut store);
    fill_new_project(&mut store, "Mobile app");
    let save = workspace::save(&mut store, now()).unwrap();

    let outcomes = drive(&mut store, &tracker, save).await;
    assert_eq!(outcomes, vec![Outcome::Alerted]);
    assert_eq!(tracker.count(Endpoint::ListProjects), 0);

    tracker.clear_failures();
    let outcomes = drive(&mut store, &tracker, refresh).await;
    assert_eq!(outcomes, vec![Outcome::Applied, Outcome::Applied]);
    assert_eq!(store.projects.len(), 2);
}

#[tokio::test]
async fn milestone_delete_refetches_projects_exactly_once() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;
    assert_eq!(store.project(ProjectId(1)).unwrap().completion_percentage, 65.0);

    workspace::request_delete(&mut store, DeleteTarget::Milestone(MilestoneId(11))).unwrap();
    let job = workspace::answer_delete(&mut store, true).unwrap();
    drive(&mut store, &tracker, job).await;

    assert_eq!(
        tracker.calls(),
        vec![
            ApiCall::DeleteMilestone(MilestoneId(11)),
            ApiCall::ListMilestones(ProjectId(1)),
            ApiCall::ListProjects,
        ]
    );
    assert_eq!(store.milestones.len(), 1);
    assert_eq!(store.project(ProjectId(1)).unwrap().completion_percentage, 100.0);
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;

    workspace::request_delete(&mut store, DeleteTarget::Risk(RiskId(20))).unwrap();
    assert!(workspace::answer_delete(&mut store, false).is_none());
    assert!(tracker.calls().is_empty());
    assert_eq!(store.risks.len(), 1);
}

#[tokio::test]
async fn responses_for_a_previous_project_are_dropped() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;

    let first = workspace::view_project(&mut store, ProjectId(1));
    let second = workspace::view_project(&mut store, ProjectId(2));

    let outcomes = drive(&mut store, &tracker, second).await;
    assert_eq!(outcomes, vec![Outcome::Applied, Outcome::Applied]);
    let outcomes = drive(&mut store, &tracker, first).await;
    assert_eq!(outcomes, vec![Outcome::Stale, Outcome::Stale]);

    assert_eq!(store.current_project_id(), Some(ProjectId(2)));
    assert!(store.milestones.iter().all(|m| m.project_id == ProjectId(2)));
    assert!(store.risks.is_empty());
}

#[tokio::test]
async fn failed_save_keeps_the_form_open_for_resubmit() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;
    tracker.fail(Endpoint::WriteRisk, server_error());

    workspace::open_create(&mut store, RecordKind::Risk, today()).unwrap();
    store
        .form
        .as_mut()
        .unwrap()
        .form
        .editable_mut()
        .set_text(0, "Key person leaves".into());
    let job = workspace::save(&mut store, now()).unwrap();
    let outcomes = drive(&mut store, &tracker, job).await;

    assert_eq!(outcomes, vec![Outcome::Alerted]);
    assert_eq!(tracker.count(Endpoint::ListRisks), 0);
    let open = store.form.as_ref().unwrap();
    assert!(!open.submitting);
    assert_eq!(open.form.editable().fields()[0].value, "Key person leaves");
    assert_eq!(
        store.alert.as_deref(),
        Some("Error saving risk: HTTP 500: boom")
    );

    tracker.clear_failures();
    let job = workspace::save(&mut store, now()).unwrap();
    let outcomes = drive(&mut store, &tracker, job).await;
    assert_eq!(outcomes, vec![Outcome::FormClosed, Outcome::Applied]);
    assert_eq!(store.risks.len(), 2);
}

#[tokio::test]
async fn summary_shows_server_text_or_fixed_error() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;
    tracker.set_summary(ProjectId(1), "On track. One high risk open.");

    let job = workspace::summarize(&mut store).unwrap();
    assert_eq!(store.summary, SummaryState::Loading);
    drive(&mut store, &tracker, job).await;
    assert_eq!(
        store.summary,
        SummaryState::Ready("On track. One high risk open.".to_string())
    );

    tracker.fail(Endpoint::Summarize, server_error());
    let job = workspace::summarize(&mut store).unwrap();
    drive(&mut store, &tracker, job).await;
    assert_eq!(
        store.summary,
        SummaryState::Failed("Error generating summary".to_string())
    );
    assert!(store.alert.is_none());
}

#[tokio::test]
async fn deleting_the_current_project_clears_it() {
    let tracker = seeded_tracker();
    let mut store = loaded_store(&tracker).await;

    workspace::request_delete(&mut store, DeleteTarget::Project(ProjectId(1))).unwrap();
    assert!(store
        .pending_delete
        .as_ref()
        .unwrap()
        .prompt
        .contains("milestones and risks"));
    let job = workspace::answer_delete(&mut store, true).unwrap();
    drive(&mut store, &tracker, job).await;

    assert_eq!(store.current_project_id(), None);
    assert!(store.milestones.is_empty());
    assert!(store.risks.is_empty());
    assert_eq!(store.projects.len(), 1);
}

// ============================================================================
// APP
// ============================================================================

fn app_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:5000".to_string(),
        request_timeout_ms: 5_000,
        refresh_interval_ms: 30_000,
        dashboard_table_limit: 10,
        persistence_path: "tmp/trackboard-state.json".into(),
        log_path: "tmp/trackboard.log".into(),
        log_filter: "trackboard_tui=info".to_string(),
        theme: ThemeConfig {
            name: "mono".to_string(),
        },
    }
}

fn press(code: KeyCode) -> TuiEvent {
    TuiEvent::Input(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    })
}

/// Feed `count` posted updates back into the app.
async fn pump(app: &mut App, rx: &mut mpsc::Receiver<TuiEvent>, count: usize) {
    for _ in 0..count {
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for an update")
            .expect("channel closed");
        app.handle_event(event);
    }
}

#[tokio::test]
async fn app_opens_a_project_from_the_dashboard() {
    let tracker = seeded_tracker();
    let (tx, mut rx) = mpsc::channel(64);
    let mut app = App::new(app_config(), Arc::new(tracker.clone()), tx);

    app.start();
    pump(&mut app, &mut rx, 2).await;
    assert_eq!(app.store.projects.len(), 2);

    app.handle_event(press(KeyCode::Char('j')));
    app.handle_event(press(KeyCode::Enter));
    assert_eq!(app.active_view, View::ProjectDetail);
    assert_eq!(app.store.current_project_id(), Some(ProjectId(2)));

    pump(&mut app, &mut rx, 2).await;
    assert_eq!(app.store.milestones.len(), 1);
    assert_eq!(app.persisted_state().current_project_id, Some(ProjectId(2)));
}

#[tokio::test]
async fn app_ignores_key_release_and_quits_on_q() {
    let tracker = seeded_tracker();
    let (tx, _rx) = mpsc::channel(64);
    let mut app = App::new(app_config(), Arc::new(tracker), tx);

    let release = TuiEvent::Input(KeyEvent {
        code: KeyCode::Char('q'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::empty(),
    });
    assert!(!app.handle_event(release));
    assert!(app.handle_event(press(KeyCode::Char('q'))));
}

#[tokio::test]
async fn app_warns_when_adding_a_milestone_without_a_project() {
    let tracker = seeded_tracker();
    let (tx, _rx) = mpsc::channel(64);
    let mut app = App::new(app_config(), Arc::new(tracker), tx);

    app.handle_event(press(KeyCode::Char('3')));
    app.handle_event(press(KeyCode::Char('n')));
    assert!(app.store.form.is_none());
    assert_eq!(
        app.notifications.last().map(|n| n.message.as_str()),
        Some("Select a project first")
    );
}

fn rendered_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
    terminal.draw(|f| render_view(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[tokio::test]
async fn app_renders_form_text_inputs() {
    let tracker = seeded_tracker();
    let (tx, mut rx) = mpsc::channel(64);
    let mut app = App::new(app_config(), Arc::new(tracker.clone()), tx);

    app.start();
    pump(&mut app, &mut rx, 2).await;
    app.handle_event(press(KeyCode::Char('e')));
    let name = app.store.form.as_ref().unwrap().form.editable().fields()[0].value.clone();

    let screen = rendered_text(&app);
    assert!(screen.contains("Edit Project"));
    assert!(screen.contains(&name));

    app.handle_event(press(KeyCode::Char('X')));
    assert!(rendered_text(&app).contains(&format!("{name}X")));
}
