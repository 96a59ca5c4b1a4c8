use crate::state::{now, App};
use crate::views::{bordered, render_placeholder};
use crate::widgets::badge_span;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, ListState},
    Frame,
};
use trackboard_core::views::{project_cards, Listing, ProjectCard};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let listing = project_cards(&app.store.projects, &now());
    let cards = match &listing {
        Listing::Empty(placeholder) => {
            return render_placeholder(f, app, area, "Projects", placeholder);
        }
        Listing::Rows(cards) => cards,
    };

    let items: Vec<ListItem> = cards.iter().map(|card| card_item(app, card)).collect();
    let list = List::new(items)
        .block(bordered(app, "Projects", true))
        .highlight_style(Style::default().bg(app.theme.bg_highlight));

    let mut state = ListState::default().with_selected(Some(app.selection.projects));
    f.render_stateful_widget(list, area, &mut state);
}

fn card_item<'a>(app: &App, card: &ProjectCard) -> ListItem<'a> {
    let theme = &app.theme;
    let dim = Style::default().fg(theme.text_dim);
    let deadline_style = if card.deadline.overdue {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(
                card.name.clone(),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            badge_span(&card.status, theme),
        ]),
        Line::from(vec![
            Span::styled("Owner: ", dim),
            Span::styled(card.owner.clone(), Style::default().fg(theme.text)),
            Span::styled("  Start: ", dim),
            Span::styled(card.start_date.clone(), Style::default().fg(theme.text)),
            Span::styled("  Deadline: ", dim),
            Span::styled(card.deadline.text.clone(), deadline_style),
        ]),
        Line::from(Span::styled(card.description.clone(), dim)),
        Line::from(vec![
            Span::styled("Completion: ", dim),
            Span::styled(
                card.progress.label.clone(),
                Style::default().fg(theme.band(card.progress.band)),
            ),
        ]),
        Line::default(),
    ];
    ListItem::new(Text::from(lines))
}
