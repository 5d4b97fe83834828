//! List menu used by the home and individual pages.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::config::Theme;

pub struct Menu {
    items: Vec<String>,
    pub state: ListState,
}

impl Menu {
    pub fn new(items: Vec<String>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self { items, state }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some(i.saturating_sub(1)));
    }

    pub fn down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some((i + 1).min(self.items.len() - 1)));
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, title: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.get("border")))
            .title(format!(" {} ", title));
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                ListItem::new(Line::from(Span::styled(
                    item.clone(),
                    Style::default().fg(theme.get("text_primary")),
                )))
            })
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .fg(theme.get("primary"))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
        StatefulWidget::render(list, inner, buf, &mut self.state);
    }
}
