//! Bottom key-hint bar.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::config::Theme;

pub struct Controls<'a> {
    hints: &'a [(&'static str, &'static str)],
    row_count: Option<usize>,
    theme: &'a Theme,
}

impl<'a> Controls<'a> {
    pub fn new(hints: &'a [(&'static str, &'static str)], theme: &'a Theme) -> Self {
        Self {
            hints,
            row_count: None,
            theme,
        }
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }
}

impl Widget for &Controls<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key_style = Style::default()
            .fg(self.theme.get("primary"))
            .add_modifier(Modifier::BOLD);
        let action_style = Style::default().fg(self.theme.get("text_secondary"));

        let mut spans: Vec<Span> = Vec::with_capacity(self.hints.len() * 3 + 1);
        for (key, action) in self.hints {
            spans.push(Span::styled(format!(" {} ", key), key_style));
            spans.push(Span::styled(format!("{}  ", action), action_style));
        }
        if let Some(rows) = self.row_count {
            spans.push(Span::styled(
                format!("Rows: {}", rows),
                Style::default().fg(self.theme.get("dimmed")),
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.get("controls_bg")))
            .render(area, buf);
    }
}
