use ratatui::style::{Color, Modifier, Style};

use papers_core::ThemePreference;

/// Color theme for the TUI.
pub struct Theme {
    pub preference: ThemePreference,

    pub done: Color,
    pub error: Color,
    pub success: Color,
    pub chip_on: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            preference: ThemePreference::Dark,

            done: Color::Rgb(0, 200, 80),
            error: Color::Rgb(255, 80, 80),
            success: Color::Rgb(0, 200, 80),
            chip_on: Color::Rgb(255, 200, 0),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    pub fn light() -> Self {
        Self {
            preference: ThemePreference::Light,

            done: Color::Rgb(0, 130, 50),
            error: Color::Rgb(190, 30, 30),
            success: Color::Rgb(0, 130, 50),
            chip_on: Color::Rgb(170, 100, 0),

            header_fg: Color::White,
            header_bg: Color::Rgb(40, 90, 170),
            border: Color::Rgb(170, 170, 185),
            text: Color::Black,
            dim: Color::Rgb(110, 110, 125),
            highlight_bg: Color::Rgb(215, 225, 245),
            active: Color::Rgb(20, 90, 200),
            footer_fg: Color::Rgb(110, 110, 125),
            footer_bg: Color::Reset,
        }
    }

    pub fn from_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Border of the pane that currently has focus.
    pub fn focus_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.active)
        } else {
            self.border_style()
        }
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }

    pub fn chip_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.chip_on)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text)
        }
    }
}
