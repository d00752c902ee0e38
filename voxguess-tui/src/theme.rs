//! Color theme, modeled on the lime/cyan look of the quiz

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text, baselines)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (titles, the primary wave, AI accents)
    pub highlight: Color,
    /// Secondary accent (the cyan wave, HUMAN accents)
    pub accent: Color,
    /// Faintest wave layer
    pub faint: Color,
    /// Correct-guess feedback
    pub success: Color,
    /// Wrong-guess feedback and errors
    pub danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::Rgb(229, 229, 229),
            fg_dim: Color::Rgb(82, 82, 82),
            bg: Color::Rgb(10, 10, 10),
            highlight: Color::Rgb(163, 230, 53), // lime
            accent: Color::Rgb(56, 189, 248),    // cyan
            faint: Color::Rgb(54, 83, 20),       // dark lime
            success: Color::Rgb(163, 230, 53),
            danger: Color::Rgb(248, 113, 113),
        }
    }
}

impl Theme {
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    pub fn ai(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    pub fn human(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn success(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn danger(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_text(&self) -> Style {
        Style::default().fg(self.danger)
    }
}
