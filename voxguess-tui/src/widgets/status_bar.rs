//! Status bar - key hints and transient messages

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct StatusBarWidget<'a> {
    hints: &'a [(&'a str, &'a str)],
    message: Option<&'a str>,
    message_is_error: bool,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self {
            hints,
            message: None,
            message_is_error: false,
            theme,
        }
    }

    pub fn message(mut self, message: Option<&'a str>, is_error: bool) -> Self {
        self.message = message;
        self.message_is_error = is_error;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(40)]).split(area);

        let mut spans = Vec::with_capacity(self.hints.len() * 2);
        for (key, action) in self.hints {
            spans.push(Span::styled(format!(" {key} "), self.theme.title()));
            spans.push(Span::styled(format!("{action}  "), self.theme.dim()));
        }
        Paragraph::new(Line::from(spans)).render(chunks[0], buf);

        if let Some(message) = self.message {
            let style = if self.message_is_error {
                self.theme.error_text()
            } else {
                self.theme.dim()
            };
            Paragraph::new(Span::styled(message, style))
                .right_aligned()
                .render(chunks[1], buf);
        }
    }
}
