use tempfile::tempdir;
use trackboard_core::ProjectId;
use trackboard_tui::nav::View;
use trackboard_tui::persistence::{self, PersistedState};

#[test]
fn state_survives_a_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");
    let state = PersistedState {
        active_view: View::ProjectDetail,
        current_project_id: Some(ProjectId(7)),
    };

    persistence::save(&path, &state).unwrap();
    assert_eq!(persistence::load(&path).unwrap(), Some(state));
}

#[test]
fn missing_file_means_no_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert_eq!(persistence::load(&path).unwrap(), None);
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(persistence::load(&path).is_err());
}
