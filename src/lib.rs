use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Tabs, Widget, Wrap};
use std::sync::mpsc::Sender;

pub mod chart_data;
pub mod cli;
pub mod config;
pub mod data;
pub mod nav;
pub mod query;
pub mod widgets;

pub use chart_data::{ChartKind, TimeWindow};
pub use cli::Args;
pub use config::{parse_color, AppConfig, ConfigManager, Theme};
pub use data::{CsvOptions, Dataset, SourcePaths};
pub use nav::{Country, Nav, Page, UnknownPageError};

use widgets::chart::{render_chart, SERIES_COLOR_KEYS};
use widgets::controls::Controls;
use widgets::menu::Menu;
use widgets::picker::{MultiPicker, SinglePicker};

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "edudash";

pub enum AppEvent {
    Key(KeyEvent),
    Open(SourcePaths, CsvOptions),
    DoLoad(SourcePaths, CsvOptions), // Internal event to actually perform loading after UI update
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

#[derive(Default)]
pub struct ErrorModal {
    pub active: bool,
    pub message: String,
}

impl ErrorModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: String) {
        self.active = true;
        self.message = message;
    }

    pub fn hide(&mut self) {
        self.active = false;
        self.message.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading {
        current_phase: String,
        progress_percent: u16, // 0-100
    },
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading { .. })
    }
}

pub struct App {
    pub nav: Nav,
    pub dataset: Option<Dataset>,
    events: Sender<AppEvent>,
    pub home_menu: Menu,
    pub individual_menu: Menu,
    pub indicator_picker: Option<(Country, MultiPicker)>,
    pub cross_picker: Option<SinglePicker>,
    pub chart_kind: ChartKind,
    pub window: TimeWindow,
    show_legend: bool,
    error_modal: ErrorModal,
    loading_state: LoadingState,
    start_page: Option<Page>,
    theme: Theme,
    debug: bool,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to create default theme: {}. Using fallback.",
                e
            );
            Theme::default()
        });
        Self::new_with_config(events, theme, &AppConfig::default())
    }

    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, config: &AppConfig) -> App {
        App {
            nav: Nav::new(),
            dataset: None,
            events,
            home_menu: Menu::new(vec![
                "Individual Analysis".to_string(),
                "Cross-country Analysis".to_string(),
            ]),
            individual_menu: Menu::new(
                Country::ALL.iter().map(|c| c.name().to_string()).collect(),
            ),
            indicator_picker: None,
            cross_picker: None,
            chart_kind: ChartKind::default(),
            window: config.display.time_window(),
            show_legend: config.display.show_legend,
            error_modal: ErrorModal::new(),
            loading_state: LoadingState::Idle,
            start_page: None,
            theme,
            debug: false,
        }
    }

    pub fn enable_debug(&mut self) {
        self.debug = true;
    }

    /// Page to jump to once the data load completes.
    pub fn set_start_page(&mut self, page: Page) {
        self.start_page = Some(page);
    }

    pub fn send_event(&mut self, event: AppEvent) -> Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    /// Handle one event, possibly producing a follow-up event for the loop.
    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.handle_key(*key),
            AppEvent::Open(paths, options) => {
                self.loading_state = LoadingState::Loading {
                    current_phase: format!("Reading {}", paths.observations.display()),
                    progress_percent: 20,
                };
                Some(AppEvent::DoLoad(paths.clone(), *options))
            }
            AppEvent::DoLoad(paths, options) => match Dataset::load(paths, options) {
                Ok(dataset) => {
                    self.dataset = Some(dataset);
                    self.loading_state = LoadingState::Idle;
                    if let Some(page) = self.start_page.take() {
                        self.enter(page);
                    }
                    None
                }
                // Load failure is fatal: the dashboard is unusable without
                // the merged table.
                Err(e) => Some(AppEvent::Crash(format!("Failed to load data: {}", e))),
            },
            AppEvent::Resize(_, _) => None,
            // Exit and Crash are consumed by the event loop in main.
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    /// Forward navigation: switch pages and build the page's widget state.
    pub fn enter(&mut self, page: Page) {
        self.nav.goto(page);
        match page {
            Page::Country(country) => self.ensure_country_picker(country),
            Page::Cross => self.ensure_cross_picker(),
            Page::Home | Page::Individual => {}
        }
    }

    fn ensure_country_picker(&mut self, country: Country) {
        if self.indicator_picker.as_ref().map(|(c, _)| *c) == Some(country) {
            return;
        }
        let Some(dataset) = &self.dataset else {
            return;
        };
        let rows = query::filter_by_country(dataset.lazy(), country.code());
        match query::indicator_options(rows) {
            Ok(options) => self.indicator_picker = Some((country, MultiPicker::new(options))),
            Err(e) => self
                .error_modal
                .show(format!("Failed to list indicators: {}", e)),
        }
    }

    fn ensure_cross_picker(&mut self) {
        if self.cross_picker.is_some() {
            return;
        }
        let Some(dataset) = &self.dataset else {
            return;
        };
        match query::indicator_options(dataset.lazy()) {
            Ok(options) => self.cross_picker = Some(SinglePicker::new(options)),
            Err(e) => self
                .error_modal
                .show(format!("Failed to list indicators: {}", e)),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.error_modal.active {
            self.error_modal.hide();
            return None;
        }
        if self.loading_state.is_loading() {
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Esc | KeyCode::Backspace => {
                self.nav.back();
                return None;
            }
            _ => {}
        }

        match self.nav.current() {
            Page::Home => self.home_key(key),
            Page::Individual => self.individual_key(key),
            Page::Cross => self.cross_key(key),
            Page::Country(_) => self.country_key(key),
        }
        None
    }

    fn home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.home_menu.up(),
            KeyCode::Down | KeyCode::Char('j') => self.home_menu.down(),
            KeyCode::Enter => match self.home_menu.selected() {
                Some(0) => self.enter(Page::Individual),
                Some(1) => self.enter(Page::Cross),
                _ => {}
            },
            _ => {}
        }
    }

    fn individual_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.individual_menu.up(),
            KeyCode::Down | KeyCode::Char('j') => self.individual_menu.down(),
            KeyCode::Enter => {
                if let Some(i) = self.individual_menu.selected() {
                    if let Some(country) = Country::ALL.get(i) {
                        self.enter(Page::Country(*country));
                    }
                }
            }
            _ => {}
        }
    }

    fn country_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('w') => {
                self.window = self.window.next();
                return;
            }
            _ => {}
        }
        let Some((_, picker)) = &mut self.indicator_picker else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => picker.up(),
            KeyCode::Down | KeyCode::Char('j') => picker.down(),
            KeyCode::Char(' ') => picker.toggle(),
            KeyCode::Char('a') => picker.select_all(),
            KeyCode::Char('n') => picker.select_none(),
            _ => {}
        }
    }

    fn cross_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.chart_kind = self.chart_kind.next(),
            KeyCode::Char('1') => self.chart_kind = ChartKind::Line,
            KeyCode::Char('2') => self.chart_kind = ChartKind::Area,
            KeyCode::Char('3') => self.chart_kind = ChartKind::Bar,
            KeyCode::Char('w') => self.window = self.window.next(),
            KeyCode::Char('l') => self.show_legend = !self.show_legend,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(picker) = &mut self.cross_picker {
                    picker.up();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(picker) = &mut self.cross_picker {
                    picker.down();
                }
            }
            _ => {}
        }
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.nav.current().title()),
            Style::default()
                .fg(self.theme.get("primary"))
                .add_modifier(Modifier::BOLD),
        )];
        match self.nav.current() {
            Page::Cross | Page::Country(_) => {
                spans.push(Span::styled(
                    format!("({}) ", self.window.label()),
                    Style::default().fg(self.theme.get("text_secondary")),
                ));
            }
            Page::Home | Page::Individual => {}
        }
        if self.debug {
            if let Some(dataset) = &self.dataset {
                spans.push(Span::styled(
                    format!("[rows: {}] ", dataset.num_rows()),
                    Style::default().fg(self.theme.get("dimmed")),
                ));
            }
        }
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.get("controls_bg")))
            .render(area, buf);
    }

    fn render_loading(&self, area: Rect, buf: &mut Buffer) {
        let LoadingState::Loading {
            current_phase,
            progress_percent,
        } = &self.loading_state
        else {
            return;
        };

        let gauge_width = (area.width as f64 * 0.33) as u16;
        let center_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(3),
                Constraint::Fill(1),
            ])
            .split(area);
        let gauge_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(gauge_width),
                Constraint::Fill(1),
            ])
            .split(center_layout[1])[1];

        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Loading"))
            .percent(*progress_percent)
            .label(current_phase.clone())
            .render(gauge_area, buf);
    }

    fn render_home(&mut self, area: Rect, buf: &mut Buffer) {
        let menu_area = centered_rect(area, 44, 4);
        self.home_menu
            .render(menu_area, buf, &self.theme, "Choose an analysis");
    }

    fn render_individual(&mut self, area: Rect, buf: &mut Buffer) {
        let menu_area = centered_rect(area, 44, 6);
        self.individual_menu
            .render(menu_area, buf, &self.theme, "Choose a country");
    }

    fn render_country(&mut self, area: Rect, buf: &mut Buffer, country: Country) {
        // The picker may not exist yet when the page was entered before the
        // data finished loading.
        self.ensure_country_picker(country);
        let Some(dataset) = &self.dataset else {
            render_message(area, buf, &self.theme, "text_secondary", "No data loaded");
            return;
        };

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Fill(1)])
            .split(area);

        let selected = match &mut self.indicator_picker {
            Some((_, picker)) => {
                picker.render(layout[0], buf, &self.theme, "Indicators");
                picker.selected_ids()
            }
            None => Vec::new(),
        };

        let rows = query::filter_by_country(dataset.lazy(), country.code());
        match query::select_indicators(rows, &selected) {
            None => render_message(
                layout[1],
                buf,
                &self.theme,
                "warning",
                "Please select at least one indicator.",
            ),
            Some(lf) => match chart_data::country_series(lf, self.window) {
                Ok(series) => render_chart(
                    layout[1],
                    buf,
                    &series,
                    ChartKind::Line,
                    &self.theme,
                    &SERIES_COLOR_KEYS,
                    self.show_legend,
                ),
                Err(e) => render_message(
                    layout[1],
                    buf,
                    &self.theme,
                    "error",
                    &format!("Chart error: {}", e),
                ),
            },
        }
    }

    fn render_cross(&mut self, area: Rect, buf: &mut Buffer) {
        self.ensure_cross_picker();
        let Some(dataset) = &self.dataset else {
            render_message(area, buf, &self.theme, "text_secondary", "No data loaded");
            return;
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .split(area);

        let current = match &mut self.cross_picker {
            Some(picker) => {
                picker.render(layout[0], buf, &self.theme, true);
                picker.current().cloned()
            }
            None => None,
        };

        let titles: Vec<Line> = ChartKind::ALL.iter().map(|k| Line::from(k.title())).collect();
        let selected_tab = ChartKind::ALL
            .iter()
            .position(|k| *k == self.chart_kind)
            .unwrap_or(0);
        Tabs::new(titles)
            .select(selected_tab)
            .style(Style::default().fg(self.theme.get("text_secondary")))
            .highlight_style(
                Style::default()
                    .fg(self.theme.get("primary"))
                    .add_modifier(Modifier::BOLD),
            )
            .render(layout[1], buf);

        let Some(option) = current else {
            render_message(
                layout[2],
                buf,
                &self.theme,
                "text_secondary",
                "No indicators available",
            );
            return;
        };

        let lf = query::filter_by_indicator(dataset.lazy(), &option.id);
        match chart_data::cross_series(lf, self.chart_kind, self.window) {
            Ok(series) => {
                let keys: Vec<&str> = series
                    .iter()
                    .map(|s| {
                        Country::from_code(&s.name)
                            .map(|c| c.color_key())
                            .unwrap_or("secondary")
                    })
                    .collect();
                render_chart(
                    layout[2],
                    buf,
                    &series,
                    self.chart_kind,
                    &self.theme,
                    &keys,
                    self.show_legend,
                );
            }
            Err(e) => render_message(
                layout[2],
                buf,
                &self.theme,
                "error",
                &format!("Chart error: {}", e),
            ),
        }
    }

    fn render_controls(&self, area: Rect, buf: &mut Buffer) {
        let hints: &[(&'static str, &'static str)] = match self.nav.current() {
            Page::Home => &[("↑↓", "Select"), ("Enter", "Open"), ("q", "Quit")],
            Page::Individual => &[
                ("↑↓", "Select"),
                ("Enter", "Open"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ],
            Page::Country(_) => &[
                ("↑↓", "Move"),
                ("Space", "Toggle"),
                ("a", "All"),
                ("n", "None"),
                ("w", "Window"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ],
            Page::Cross => &[
                ("↑↓", "Indicator"),
                ("Tab", "Chart"),
                ("w", "Window"),
                ("l", "Legend"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ],
        };
        let mut controls = Controls::new(hints, &self.theme);
        if let Some(dataset) = &self.dataset {
            controls = controls.with_row_count(dataset.num_rows());
        }
        (&controls).render(area, buf);
    }

    fn render_error_modal(&self, area: Rect, buf: &mut Buffer) {
        let modal_area = centered_rect(area, 60, 7);
        Clear.render(modal_area, buf);
        Paragraph::new(self.error_modal.message.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(self.theme.get("text_primary")))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("error")))
                    .title(" Error "),
            )
            .render(modal_area, buf);
    }
}

fn render_message(area: Rect, buf: &mut Buffer, theme: &Theme, color: &str, message: &str) {
    Paragraph::new(message.to_string())
        .style(Style::default().fg(theme.get(color)))
        .centered()
        .render(area, buf);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title(layout[0], buf);

        if self.loading_state.is_loading() {
            self.render_loading(layout[1], buf);
        } else {
            match self.nav.current() {
                Page::Home => self.render_home(layout[1], buf),
                Page::Individual => self.render_individual(layout[1], buf),
                Page::Cross => self.render_cross(layout[1], buf),
                Page::Country(country) => self.render_country(layout[1], buf, country),
            }
        }

        self.render_controls(layout[2], buf);

        if self.error_modal.active {
            self.render_error_modal(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn error_modal_show_hide() {
        let mut modal = ErrorModal::new();
        assert!(!modal.active);
        modal.show("boom".to_string());
        assert!(modal.active);
        assert_eq!(modal.message, "boom");
        modal.hide();
        assert!(!modal.active);
        assert!(modal.message.is_empty());
    }

    #[test]
    fn quit_key_produces_exit() {
        let (tx, _rx) = channel();
        let mut app = App::new(tx);
        let key = KeyEvent::from(KeyCode::Char('q'));
        assert!(matches!(
            app.event(&AppEvent::Key(key)),
            Some(AppEvent::Exit)
        ));
    }

    #[test]
    fn menu_enter_navigates_without_data() {
        let (tx, _rx) = channel();
        let mut app = App::new(tx);
        app.event(&AppEvent::Key(KeyEvent::from(KeyCode::Enter)));
        assert_eq!(app.nav.current(), Page::Individual);
        app.event(&AppEvent::Key(KeyEvent::from(KeyCode::Esc)));
        assert_eq!(app.nav.current(), Page::Home);
    }

    #[test]
    fn open_event_yields_do_load() {
        let (tx, _rx) = channel();
        let mut app = App::new(tx);
        let paths = SourcePaths {
            observations: "missing_obs.csv".into(),
            metadata: "missing_meta.csv".into(),
        };
        let next = app.event(&AppEvent::Open(paths, CsvOptions::default()));
        assert!(matches!(next, Some(AppEvent::DoLoad(_, _))));
        // Loading a missing file is fatal.
        let crash = app.event(&next.unwrap());
        assert!(matches!(crash, Some(AppEvent::Crash(_))));
    }
}
