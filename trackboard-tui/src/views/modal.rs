//! Overlays: record form, delete confirmation, blocking alert, and help.

use crate::state::App;
use crate::store::OpenForm;
use crate::views::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use trackboard_core::forms::FieldKind;

const HELP: &[(&str, &str)] = &[
    ("1-3 / Tab", "switch view"),
    ("j/k", "move selection"),
    ("h/l", "switch milestones and risks"),
    ("Enter", "open project"),
    ("n", "new record"),
    ("e", "edit selected"),
    ("d", "delete selected"),
    ("r", "refresh"),
    ("x", "export CSV"),
    ("s", "generate summary"),
    ("Ctrl-S", "save form"),
    ("Esc", "close form"),
    ("q", "quit"),
];

pub fn render(f: &mut Frame<'_>, app: &App) {
    if let Some(open) = &app.store.form {
        render_form(f, app, open);
    }
    if let Some(pending) = &app.store.pending_delete {
        render_message(
            f,
            app,
            "Confirm Delete",
            &pending.prompt,
            "y confirm • n cancel",
            app.theme.warning,
        );
    }
    if let Some(alert) = &app.store.alert {
        render_message(f, app, "Error", alert, "Press any key", app.theme.error);
    }
    if app.show_help {
        render_help(f, app);
    }
}

fn render_form(f: &mut Frame<'_>, app: &App, open: &OpenForm) {
    let theme = &app.theme;
    let form = open.form.editable();
    let fields = form.fields();
    let focus = app.editor.as_ref().map(|editor| editor.focus).unwrap_or(0);

    let area = centered_rect(60, 85, f.size());
    f.render_widget(Clear, area);
    let title = if open.submitting {
        format!("{} (saving...)", form.title())
    } else {
        form.title().to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focus));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(2));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, field) in fields.iter().enumerate() {
        let focused = index == focus;
        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.to_string()
        };
        let border = if focused {
            theme.border_focus
        } else {
            theme.border
        };
        let field_block = Block::default()
            .title(Span::styled(label, Style::default().fg(theme.text_dim)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let field_inner = field_block.inner(rows[index]);
        f.render_widget(field_block, rows[index]);

        let input = app.editor.as_ref().and_then(|editor| editor.input(index));
        match (field.kind, input) {
            (FieldKind::Choice, _) | (_, None) => {
                let value = if field.kind == FieldKind::Choice {
                    format!("< {} >", field.value)
                } else {
                    field.value.clone()
                };
                let style = if focused {
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                f.render_widget(Paragraph::new(Span::styled(value, style)), field_inner);
            }
            (_, Some(textarea)) => f.render_widget(textarea, field_inner),
        }
    }

    let status = match &open.error {
        Some(error) => Line::from(Span::styled(error.as_str(), Style::default().fg(theme.error))),
        None => Line::from(Span::styled(
            "Ctrl-S save • Tab next field • ←/→ change choice • Esc cancel",
            Style::default().fg(theme.text_muted),
        )),
    };
    f.render_widget(
        Paragraph::new(status).wrap(Wrap { trim: true }),
        rows[fields.len()],
    );
}

fn render_message(
    f: &mut Frame<'_>,
    app: &App,
    title: &str,
    message: &str,
    hint: &str,
    color: ratatui::style::Color,
) {
    let area = centered_rect(50, 30, f.size());
    f.render_widget(Clear, area);
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(app.theme.text))),
        Line::default(),
        Line::from(Span::styled(hint, Style::default().fg(app.theme.text_muted))),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(paragraph, area);
}

fn render_help(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(50, 70, f.size());
    f.render_widget(Clear, area);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:<12}"),
                    Style::default().fg(app.theme.primary),
                ),
                Span::styled(*action, Style::default().fg(app.theme.text)),
            ])
        })
        .collect();
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title("Keys")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(paragraph, area);
}
