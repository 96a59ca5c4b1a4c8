use crate::state::{now, App};
use crate::views::{bordered, render_placeholder};
use crate::widgets::{badge_span, KpiTile};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Row, Table, TableState},
    Frame,
};
use trackboard_core::views::{
    completion_bars, dashboard_table, format_percent, status_distribution, CompletionBand,
    Listing,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Min(5),
        ])
        .split(area);

    render_kpis(f, app, chunks[0]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    render_status_chart(f, app, charts[0]);
    render_completion_chart(f, app, charts[1]);

    render_table(f, app, chunks[2]);
}

fn render_kpis(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    let theme = &app.theme;
    let border_style = Style::default().fg(theme.border);
    let values = match &app.store.kpis {
        Some(kpis) => [
            (format_percent(kpis.projects_on_track), theme.success),
            (format_percent(kpis.avg_delay_percentage), theme.warning),
            (kpis.high_risk_count.to_string(), theme.error),
            (
                format_percent(kpis.avg_completion),
                theme.band(CompletionBand::from_percentage(kpis.avg_completion)),
            ),
        ],
        None => std::array::from_fn(|_| ("--".to_string(), theme.text_muted)),
    };
    let titles = ["On Track", "Avg Delay", "High Risks", "Avg Completion"];
    for ((title, (value, color)), area) in titles.into_iter().zip(values).zip(tiles.iter()) {
        KpiTile {
            title,
            value,
            style: Style::default().fg(color),
            border_style,
        }
        .render(f, *area);
    }
}

fn render_status_chart(f: &mut Frame<'_>, app: &App, area: Rect) {
    let slices = status_distribution(&app.store.projects);
    let bars: Vec<Bar> = slices
        .iter()
        .map(|slice| {
            let color = app.theme.tone(slice.status.tone());
            Bar::default()
                .value(slice.count as u64)
                .label(Line::from(slice.label()))
                .text_value(format!("{} ({})", slice.count, format_percent(slice.share)))
                .style(Style::default().fg(color))
        })
        .collect();
    let chart = BarChart::default()
        .block(bordered(app, "Status", false))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(app.theme.text))
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_completion_chart(f: &mut Frame<'_>, app: &App, area: Rect) {
    let bars: Vec<Bar> = completion_bars(&app.store.projects)
        .into_iter()
        .map(|bar| {
            let color = app.theme.band(bar.progress.band);
            Bar::default()
                .value(bar.progress.value.round() as u64)
                .label(Line::from(bar.name))
                .text_value(bar.progress.label)
                .style(Style::default().fg(color))
        })
        .collect();
    let chart = BarChart::default()
        .block(bordered(app, "Completion", false))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(100)
        .value_style(Style::default().fg(app.theme.text))
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame<'_>, app: &App, area: Rect) {
    let listing = dashboard_table(
        &app.store.projects,
        app.config.dashboard_table_limit,
        &now(),
    );
    let rows = match &listing {
        Listing::Empty(placeholder) => {
            return render_placeholder(f, app, area, "Recent Projects", placeholder);
        }
        Listing::Rows(rows) => rows,
    };
    let theme = &app.theme;
    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let deadline_style = if row.deadline.overdue {
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(vec![
                Cell::from(row.name.clone()),
                Cell::from(row.owner.clone()),
                Cell::from(badge_span(&row.status, theme)),
                Cell::from(Span::styled(
                    row.progress.label.clone(),
                    Style::default().fg(theme.band(row.progress.band)),
                )),
                Cell::from(Span::styled(row.deadline.text.clone(), deadline_style)),
            ])
        })
        .collect();
    let header = Row::new(vec!["Name", "Owner", "Status", "Completion", "Deadline"])
        .style(Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD));
    let table = Table::new(
        table_rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(14),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(bordered(app, "Recent Projects", true))
    .highlight_style(Style::default().bg(theme.bg_highlight));

    let mut state = TableState::default().with_selected(Some(app.selection.dashboard));
    f.render_stateful_widget(table, area, &mut state);
}
