//! Round progress and running score

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget},
};

pub struct ScoreBarWidget<'a> {
    round: usize,
    total_rounds: usize,
    score: u32,
    theme: &'a Theme,
}

impl<'a> ScoreBarWidget<'a> {
    pub fn new(round: usize, total_rounds: usize, score: u32, theme: &'a Theme) -> Self {
        Self {
            round,
            total_rounds,
            score,
            theme,
        }
    }
}

impl Widget for ScoreBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Length(16),
            Constraint::Min(10),
            Constraint::Length(14),
        ])
        .split(area);

        Paragraph::new(Line::from(vec![
            Span::styled("ROUND ", self.theme.dim()),
            Span::styled(
                format!("{}/{}", self.round, self.total_rounds),
                self.theme.title(),
            ),
        ]))
        .render(chunks[0], buf);

        let ratio = if self.total_rounds > 0 {
            // Show progress through the session, current round included
            self.round as f64 / self.total_rounds as f64
        } else {
            0.0
        };
        Gauge::default()
            .gauge_style(self.theme.ai())
            .ratio(ratio.clamp(0.0, 1.0))
            .label("")
            .render(chunks[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("SCORE ", self.theme.dim()),
            Span::styled(self.score.to_string(), self.theme.title()),
        ]))
        .right_aligned()
        .render(chunks[2], buf);
    }
}
