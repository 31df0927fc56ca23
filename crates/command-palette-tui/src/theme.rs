use ratatui::{prelude::*, style::palette::tailwind};

/// Colors and derived styles for the demo screen
#[derive(Debug, Clone)]
pub struct Theme {
    // Surfaces, darkest first
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_panel: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,

    pub status_error: Color,
    pub status_warning: Color,
    pub status_info: Color,

    /// Highlighted suggestion row
    pub selected_bg: Color,
    pub selected_fg: Color,
    /// Matched characters in suggestion names
    pub match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::indigo()
    }
}

impl Theme {
    /// Indigo surfaces with teal accents
    pub fn indigo() -> Self {
        Self {
            bg_primary: tailwind::ZINC.c950,
            bg_secondary: tailwind::ZINC.c900,
            bg_panel: tailwind::INDIGO.c950,

            text_primary: tailwind::ZINC.c100,
            text_secondary: tailwind::INDIGO.c200,
            text_muted: tailwind::ZINC.c500,

            accent_primary: tailwind::TEAL.c400,
            accent_secondary: tailwind::INDIGO.c500,

            status_error: tailwind::ROSE.c400,
            status_warning: tailwind::ORANGE.c300,
            status_info: tailwind::SKY.c400,

            selected_bg: tailwind::INDIGO.c600,
            selected_fg: tailwind::ZINC.c50,
            match_fg: tailwind::AMBER.c300,
        }
    }

    pub fn panel_border(&self) -> Style {
        Style::new()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Keys in hint lines, e.g. "Enter" in "Enter run"
    pub fn key_hint(&self) -> Style {
        Style::new().fg(self.accent_primary)
    }

    pub fn muted(&self) -> Style {
        Style::new().fg(self.text_muted)
    }

    pub fn error(&self) -> Style {
        Style::new()
            .fg(self.status_error)
            .add_modifier(Modifier::BOLD)
    }

    /// The "[ Open palette ]" trigger
    pub fn button(&self) -> Style {
        Style::new()
            .fg(self.selected_fg)
            .bg(self.accent_secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn log_level(&self, level: log::Level) -> Style {
        match level {
            log::Level::Error => self.error(),
            log::Level::Warn => Style::new().fg(self.status_warning),
            log::Level::Info => Style::new().fg(self.status_info),
            log::Level::Debug | log::Level::Trace => self.muted(),
        }
    }
}
