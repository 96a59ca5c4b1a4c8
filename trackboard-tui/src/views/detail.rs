use crate::nav::Panel;
use crate::state::{now, App};
use crate::store::SummaryState;
use crate::views::{bordered, render_placeholder};
use crate::widgets::{badge_span, DetailPanel, ProgressBar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use trackboard_core::dates::display_date;
use trackboard_core::views::{
    milestone_items, risk_items, Listing, MilestoneItem, Placeholder, Progress, RiskItem,
};
use trackboard_core::Project;

const NO_PROJECT: Placeholder = Placeholder {
    message: "No project selected.",
    call_to_action: None,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(project) = app.store.current_project() else {
        return render_placeholder(f, app, area, "Project", &NO_PROJECT);
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(7),
        ])
        .split(area);

    render_project(f, app, project, chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_milestones(f, app, panels[0]);
    render_risks(f, app, panels[1]);

    render_summary(f, app, chunks[2]);
}

fn render_project(f: &mut Frame<'_>, app: &App, project: &Project, area: Rect) {
    let theme = &app.theme;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let text = Style::default().fg(theme.text);
    let description = project.description.as_deref().unwrap_or("No description");
    let panel = DetailPanel {
        title: project.name.as_str(),
        fields: vec![
            ("Owner", Span::styled(project.owner.as_str(), text)),
            ("Status", badge_span(&project.status.into(), theme)),
            (
                "Dates",
                Span::styled(
                    format!(
                        "{} to {}",
                        display_date(&project.start_date),
                        display_date(&project.deadline)
                    ),
                    text,
                ),
            ),
            ("Description", Span::styled(description, text)),
        ],
        label_style: Style::default().fg(theme.text_dim),
        border_style: Style::default().fg(theme.border),
    };
    panel.render(f, rows[0]);

    let progress = Progress::new(project.completion_percentage);
    ProgressBar {
        title: "Completion",
        progress: &progress,
        theme,
    }
    .render(f, rows[1]);
}

fn render_milestones(f: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.panel == Panel::Milestones;
    let listing = milestone_items(&app.store.milestones, &now());
    let items = match &listing {
        Listing::Empty(placeholder) => {
            return render_placeholder(f, app, area, "Milestones", placeholder);
        }
        Listing::Rows(items) => items,
    };
    let list_items: Vec<ListItem> = items.iter().map(|item| milestone_item(app, item)).collect();
    render_list(f, app, area, "Milestones", focused, list_items, app.selection.milestones);
}

fn milestone_item<'a>(app: &App, item: &MilestoneItem) -> ListItem<'a> {
    let theme = &app.theme;
    let dim = Style::default().fg(theme.text_dim);
    let target_style = if item.target.overdue {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let mut when = vec![
        Span::styled("Target: ", dim),
        Span::styled(item.target.text.clone(), target_style),
    ];
    if let Some(done) = &item.completed_on {
        when.push(Span::styled("  Completed: ", dim));
        when.push(Span::styled(done.clone(), Style::default().fg(theme.success)));
    }
    ListItem::new(Text::from(vec![
        Line::from(vec![
            Span::styled(item.name.clone(), Style::default().fg(theme.text)),
            Span::raw(" "),
            badge_span(&item.status, theme),
        ]),
        Line::from(Span::styled(item.description.clone(), dim)),
        Line::from(when),
    ]))
}

fn render_risks(f: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.panel == Panel::Risks;
    let listing = risk_items(&app.store.risks);
    let items = match &listing {
        Listing::Empty(placeholder) => {
            return render_placeholder(f, app, area, "Risks", placeholder);
        }
        Listing::Rows(items) => items,
    };
    let list_items: Vec<ListItem> = items.iter().map(|item| risk_item(app, item)).collect();
    render_list(f, app, area, "Risks", focused, list_items, app.selection.risks);
}

fn risk_item<'a>(app: &App, item: &RiskItem) -> ListItem<'a> {
    let theme = &app.theme;
    let dim = Style::default().fg(theme.text_dim);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(item.name.clone(), Style::default().fg(theme.text)),
            Span::raw(" "),
            badge_span(&item.severity, theme),
            Span::raw(" "),
            badge_span(&item.status, theme),
        ]),
        Line::from(Span::styled(item.description.clone(), dim)),
    ];
    if let Some(plan) = &item.mitigation_plan {
        lines.push(Line::from(vec![
            Span::styled("Mitigation: ", dim),
            Span::styled(plan.clone(), Style::default().fg(theme.text)),
        ]));
    }
    ListItem::new(Text::from(lines))
}

fn render_list(
    f: &mut Frame<'_>,
    app: &App,
    area: Rect,
    title: &str,
    focused: bool,
    items: Vec<ListItem<'_>>,
    selected: usize,
) {
    let highlight = if focused {
        Style::default().bg(app.theme.bg_highlight)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(bordered(app, title, focused))
        .highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_summary(f: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let (content, color) = match &app.store.summary {
        SummaryState::Idle => ("Press s to generate an AI summary.", theme.text_muted),
        SummaryState::Loading => ("Generating summary...", theme.info),
        SummaryState::Ready(text) => (text.as_str(), theme.text),
        SummaryState::Failed(message) => (message.as_str(), theme.error),
    };
    let paragraph = Paragraph::new(content)
        .style(Style::default().fg(color))
        .block(bordered(app, "AI Summary", false))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
