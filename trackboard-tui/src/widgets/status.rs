//! KPI tiles and status badges.

use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use trackboard_core::views::Badge;

/// One headline number on the dashboard.
pub struct KpiTile<'a> {
    pub title: &'a str,
    pub value: String,
    pub style: Style,
    pub border_style: Style,
}

impl<'a> KpiTile<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            self.value.as_str(),
            self.style.add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(paragraph, area);
    }
}

pub fn badge_span<'a>(badge: &Badge, theme: &Theme) -> Span<'a> {
    Span::styled(
        format!("[{}]", badge.label),
        Style::default().fg(theme.tone(badge.tone)),
    )
}
