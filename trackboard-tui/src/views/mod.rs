//! View rendering dispatch.

pub mod dashboard;
pub mod detail;
pub mod modal;
pub mod projects;

use crate::nav::View;
use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use trackboard_core::views::Placeholder;

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Dashboard => dashboard::render(f, app, layout[1]),
        View::Projects => projects::render(f, app, layout[1]),
        View::ProjectDetail => detail::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);
    modal::render(f, app);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let titles: Vec<Line> = View::all()
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();
    let project = app
        .store
        .current_project()
        .map(|p| format!("Trackboard | {}", p.name))
        .unwrap_or_else(|| "Trackboard".to_string());
    let tabs = Tabs::new(titles)
        .select(app.active_view.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(Span::styled(project, Style::default().fg(app.theme.primary))),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = "j/k move • Enter open • n new • e edit • d delete • r refresh • x export • s summary • ? help • q quit";
    let (text, style) = match app.notifications.last() {
        Some(note) => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(app.theme.notification(note.level)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(style);
    f.render_widget(footer, area);
}

/// Empty-state message with its optional call to action.
pub(crate) fn render_placeholder(
    f: &mut Frame<'_>,
    app: &App,
    area: Rect,
    title: &str,
    placeholder: &Placeholder,
) {
    let mut lines = vec![Line::from(Span::styled(
        placeholder.message,
        Style::default().fg(app.theme.text_dim),
    ))];
    if let Some(cta) = placeholder.call_to_action {
        lines.push(Line::from(Span::styled(
            format!("{cta} (press n)"),
            Style::default().fg(app.theme.primary),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(bordered(app, title, false));
    f.render_widget(paragraph, area);
}

pub(crate) fn bordered<'a>(app: &App, title: &'a str, focused: bool) -> Block<'a> {
    let color = if focused {
        app.theme.border_focus
    } else {
        app.theme.border
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

/// A rectangle of the given percentage size centred in `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
