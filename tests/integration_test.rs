use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use edudash::{App, AppEvent, ChartKind, Country, CsvOptions, Page, SourcePaths};
use polars::prelude::*;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use std::fs::File;
use std::sync::mpsc;
use tempfile::TempDir;

fn key(app: &mut App, code: KeyCode) {
    let event = AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE));
    assert!(app.event(&event).is_none());
}

fn buffer_text(buf: &Buffer) -> String {
    buf.content.iter().map(|cell| cell.symbol()).collect()
}

fn render_to_text(app: &mut App) -> String {
    let area = Rect::new(0, 0, 120, 36);
    let mut buf = Buffer::empty(area);
    app.render(area, &mut buf);
    buffer_text(&buf)
}

/// Build sample CSVs, open them through the event chain, and return the app
/// with its data loaded.
fn loaded_app() -> (App, TempDir) {
    let dir = TempDir::new().unwrap();

    let mut obs = df!(
        "indicator_id" => &[
            "NER.02.CP", "NER.02.CP", "NER.02.CP",
            "XGDP.FSGOV", "XGDP.FSGOV",
            "NER.02.CP", "XGDP.FSGOV"
        ],
        "country_id" => &["NPL", "NPL", "NPL", "NPL", "NPL", "USA", "EST"],
        "year" => &[2010i64, 2011, 2012, 2010, 2011, 2010, 2011],
        "value" => &[10.0f64, 12.0, 14.0, 3.0, 3.5, 60.0, 5.0],
        "indicator_desc" => &["x", "x", "x", "x", "x", "x", "x"]
    )
    .unwrap();
    let obs_path = dir.path().join("obs.csv");
    let mut file = File::create(&obs_path).unwrap();
    CsvWriter::new(&mut file).finish(&mut obs).unwrap();

    let mut meta = df!(
        "INDICATOR_ID" => &["NER.02.CP", "XGDP.FSGOV"],
        "INDICATOR_LABEL_EN" => &["Net enrolment rate", "Expenditure on education"]
    )
    .unwrap();
    let meta_path = dir.path().join("meta.csv");
    let mut file = File::create(&meta_path).unwrap();
    CsvWriter::new(&mut file).finish(&mut meta).unwrap();

    let (tx, _rx) = mpsc::channel();
    let mut app = App::new(tx);
    let paths = SourcePaths {
        observations: obs_path,
        metadata: meta_path,
    };
    let event = AppEvent::Open(paths, CsvOptions::default());
    if let Some(next_event) = app.event(&event) {
        assert!(
            app.event(&next_event).is_none(),
            "load should not crash"
        );
    }
    (app, dir)
}

#[test]
fn test_app_creation() {
    let (tx, _) = mpsc::channel();
    let app = App::new(tx);
    assert_eq!(app.nav.current(), Page::Home);
    assert!(app.dataset.is_none());
}

#[test]
fn test_load_through_event_chain() {
    let (app, _dir) = loaded_app();
    let dataset = app.dataset.as_ref().unwrap();
    assert_eq!(dataset.num_rows(), 7);
}

#[test]
fn test_navigation_workflow() {
    let (mut app, _dir) = loaded_app();

    // Home -> Individual -> Nepal
    key(&mut app, KeyCode::Enter);
    assert_eq!(app.nav.current(), Page::Individual);
    key(&mut app, KeyCode::Enter);
    assert_eq!(app.nav.current(), Page::Country(Country::Nepal));

    // The multiselect was built for Nepal, sorted, defaulting to all.
    let (country, picker) = app.indicator_picker.as_ref().unwrap();
    assert_eq!(*country, Country::Nepal);
    assert_eq!(
        picker.selected_ids(),
        vec!["NER.02.CP".to_string(), "XGDP.FSGOV".to_string()]
    );

    // Back chain: Nepal -> Individual -> Home -> (stays) Home
    key(&mut app, KeyCode::Esc);
    assert_eq!(app.nav.current(), Page::Individual);
    key(&mut app, KeyCode::Esc);
    assert_eq!(app.nav.current(), Page::Home);
    key(&mut app, KeyCode::Esc);
    assert_eq!(app.nav.current(), Page::Home);
}

#[test]
fn test_empty_selection_shows_warning_not_chart() {
    let (mut app, _dir) = loaded_app();
    key(&mut app, KeyCode::Enter); // Individual
    key(&mut app, KeyCode::Enter); // Nepal

    key(&mut app, KeyCode::Char('n')); // deselect everything
    let (_, picker) = app.indicator_picker.as_ref().unwrap();
    assert!(picker.selected_ids().is_empty());

    let text = render_to_text(&mut app);
    assert!(text.contains("Please select at least one indicator."));
}

#[test]
fn test_country_page_renders_chart_with_selection() {
    let (mut app, _dir) = loaded_app();
    key(&mut app, KeyCode::Enter);
    key(&mut app, KeyCode::Enter);

    let text = render_to_text(&mut app);
    assert!(text.contains("Nepal Analysis"));
    assert!(!text.contains("Please select at least one indicator."));
}

#[test]
fn test_cross_page_chart_kinds() {
    let (mut app, _dir) = loaded_app();
    key(&mut app, KeyCode::Down); // highlight "Cross-country Analysis"
    key(&mut app, KeyCode::Enter);
    assert_eq!(app.nav.current(), Page::Cross);

    // Options derived from the data, sorted.
    let picker = app.cross_picker.as_ref().unwrap();
    assert_eq!(picker.current().unwrap().id, "NER.02.CP");

    assert_eq!(app.chart_kind, ChartKind::Line);
    key(&mut app, KeyCode::Tab);
    assert_eq!(app.chart_kind, ChartKind::Area);
    key(&mut app, KeyCode::Char('3'));
    assert_eq!(app.chart_kind, ChartKind::Bar);

    let text = render_to_text(&mut app);
    assert!(text.contains("Cross-country Analysis"));
    assert!(text.contains("Bar Chart"));
}

#[test]
fn test_time_window_cycles_with_key() {
    let (mut app, _dir) = loaded_app();
    key(&mut app, KeyCode::Down);
    key(&mut app, KeyCode::Enter); // Cross

    let before = app.window;
    key(&mut app, KeyCode::Char('w'));
    assert_ne!(app.window, before);
}

#[test]
fn test_quit_from_any_page() {
    let (mut app, _dir) = loaded_app();
    key(&mut app, KeyCode::Enter);
    let event = AppEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
    assert!(matches!(app.event(&event), Some(AppEvent::Exit)));
}
