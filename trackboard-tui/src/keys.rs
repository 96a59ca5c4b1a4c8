//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    FocusLeft,
    FocusRight,
    Open,
    NewItem,
    EditItem,
    DeleteItem,
    Refresh,
    ExportCsv,
    Summarize,
    OpenHelp,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('x') => Some(Action::ExportCsv),
        KeyCode::Char('s') => Some(Action::Summarize),
        KeyCode::Enter => Some(Action::Open),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::FocusLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::FocusRight),
        KeyCode::Char(c @ '1'..='3') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Keys while the record form modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    NextField,
    PrevField,
    Left,
    Right,
    Submit,
    Cancel,
    /// Anything else goes to the focused text input.
    Edit(KeyEvent),
}

pub fn map_form_key(event: KeyEvent) -> FormKey {
    let KeyEvent { code, modifiers, .. } = event;
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('s') {
        return FormKey::Submit;
    }
    match code {
        KeyCode::Tab | KeyCode::Down => FormKey::NextField,
        KeyCode::BackTab | KeyCode::Up => FormKey::PrevField,
        KeyCode::Left => FormKey::Left,
        KeyCode::Right => FormKey::Right,
        KeyCode::Enter => FormKey::Submit,
        KeyCode::Esc => FormKey::Cancel,
        _ => FormKey::Edit(event),
    }
}

/// Answer to a yes/no confirmation prompt.
pub fn map_confirm_key(event: KeyEvent) -> Option<bool> {
    match event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}
