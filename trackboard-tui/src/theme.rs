//! Colour palettes and tone mapping.

use crate::notifications::NotificationLevel;
use ratatui::style::Color;
use trackboard_core::views::CompletionBand;
use trackboard_core::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Slate,
    Mono,
}

impl ThemeName {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "slate" => Some(ThemeName::Slate),
            "mono" => Some(ThemeName::Mono),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Slate => Self::slate(),
            ThemeName::Mono => Self::mono(),
        }
    }

    pub fn slate() -> Self {
        Self {
            bg: Color::Rgb(15, 23, 42),
            bg_highlight: Color::Rgb(51, 65, 85),
            primary: Color::Rgb(59, 130, 246),
            secondary: Color::Rgb(148, 163, 184),
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(234, 179, 8),
            error: Color::Rgb(239, 68, 68),
            info: Color::Rgb(56, 189, 248),
            text: Color::Rgb(241, 245, 249),
            text_dim: Color::Rgb(148, 163, 184),
            text_muted: Color::Rgb(100, 116, 139),
            border: Color::Rgb(71, 85, 105),
            border_focus: Color::Rgb(59, 130, 246),
        }
    }

    /// Terminal-default colours only, for limited palettes.
    pub fn mono() -> Self {
        Self {
            bg: Color::Reset,
            bg_highlight: Color::DarkGray,
            primary: Color::White,
            secondary: Color::Gray,
            success: Color::White,
            warning: Color::Gray,
            error: Color::White,
            info: Color::Gray,
            text: Color::White,
            text_dim: Color::Gray,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focus: Color::White,
        }
    }

    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Neutral => self.text_dim,
            Tone::Primary => self.primary,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
            Tone::Danger => self.error,
            Tone::Muted => self.text_muted,
        }
    }

    pub fn band(&self, band: CompletionBand) -> Color {
        self.tone(band.tone())
    }

    pub fn notification(&self, level: NotificationLevel) -> Color {
        match level {
            NotificationLevel::Info => self.info,
            NotificationLevel::Warning => self.warning,
            NotificationLevel::Error => self.error,
            NotificationLevel::Success => self.success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_are_case_insensitive() {
        assert_eq!(ThemeName::parse(" Slate "), Some(ThemeName::Slate));
        assert_eq!(ThemeName::parse("MONO"), Some(ThemeName::Mono));
        assert_eq!(ThemeName::parse("synthwave"), None);
    }

    #[test]
    fn bands_share_tone_colours() {
        let theme = Theme::slate();
        assert_eq!(theme.band(CompletionBand::Good), theme.success);
        assert_eq!(theme.band(CompletionBand::Warning), theme.warning);
        assert_eq!(theme.band(CompletionBand::Risk), theme.error);
    }
}
