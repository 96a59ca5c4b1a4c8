//! Completion gauge coloured by band.

use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};
use trackboard_core::views::Progress;

pub struct ProgressBar<'a> {
    pub title: &'a str,
    pub progress: &'a Progress,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let color = self.theme.band(self.progress.band);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border)),
            )
            .gauge_style(Style::default().fg(color).bg(self.theme.bg_highlight))
            .ratio(self.progress.ratio())
            .label(self.progress.label.as_str());
        f.render_widget(gauge, area);
    }
}
