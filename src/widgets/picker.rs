//! Indicator selection widgets: a multiselect for the country pages and a
//! single-select list for the cross page.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::config::Theme;
use crate::query::IndicatorOption;

/// Multiselect over a country's indicators. Defaults to everything selected.
pub struct MultiPicker {
    options: Vec<IndicatorOption>,
    selected: Vec<bool>,
    pub state: ListState,
}

impl MultiPicker {
    pub fn new(options: Vec<IndicatorOption>) -> Self {
        let selected = vec![true; options.len()];
        let mut state = ListState::default();
        if !options.is_empty() {
            state.select(Some(0));
        }
        Self {
            options,
            selected,
            state,
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn up(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some(i.saturating_sub(1)));
    }

    pub fn down(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some((i + 1).min(self.options.len() - 1)));
    }

    /// Toggle the indicator under the cursor.
    pub fn toggle(&mut self) {
        if let Some(i) = self.state.selected() {
            if let Some(flag) = self.selected.get_mut(i) {
                *flag = !*flag;
            }
        }
    }

    pub fn select_all(&mut self) {
        self.selected.fill(true);
    }

    pub fn select_none(&mut self) {
        self.selected.fill(false);
    }

    /// Ids of the currently selected indicators, in option order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(option, _)| option.id.clone())
            .collect()
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, title: &str) {
        let border = if self.selected_ids().is_empty() {
            theme.get("warning")
        } else {
            theme.get("border")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", title));
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .zip(&self.selected)
            .map(|(option, selected)| {
                let marker = if *selected { "☑" } else { "☐" };
                let style = if *selected {
                    Style::default().fg(theme.get("text_primary"))
                } else {
                    Style::default().fg(theme.get("text_secondary"))
                };
                ListItem::new(Line::from(Span::styled(
                    format!("{} {}", marker, option.display()),
                    style,
                )))
            })
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .fg(theme.get("primary"))
                .add_modifier(Modifier::BOLD),
        );
        StatefulWidget::render(list, inner, buf, &mut self.state);
    }
}

/// Single-select list over all indicators, for the cross page.
pub struct SinglePicker {
    options: Vec<IndicatorOption>,
    pub state: ListState,
}

impl SinglePicker {
    pub fn new(options: Vec<IndicatorOption>) -> Self {
        let mut state = ListState::default();
        if !options.is_empty() {
            state.select(Some(0));
        }
        Self { options, state }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn up(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some(i.saturating_sub(1)));
    }

    pub fn down(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some((i + 1).min(self.options.len() - 1)));
    }

    pub fn current(&self) -> Option<&IndicatorOption> {
        self.state.selected().and_then(|i| self.options.get(i))
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let border = if focused {
            theme.get("border_active")
        } else {
            theme.get("border")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Indicator ");
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|option| {
                ListItem::new(Line::from(Span::styled(
                    option.display(),
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
