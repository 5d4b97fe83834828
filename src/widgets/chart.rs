//! Chart area: renders prepared series with per-series colors.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget},
};

use crate::chart_data::{ChartKind, ChartSeries};
use crate::config::Theme;

/// Theme keys cycled for series without a fixed color (indicator series on
/// the country pages).
pub const SERIES_COLOR_KEYS: [&str; 7] = [
    "series_1", "series_2", "series_3", "series_4", "series_5", "series_6", "series_7",
];

/// Renders the chart area. `color_keys` supplies one theme key per series,
/// cycled when there are more series than keys.
pub fn render_chart(
    area: Rect,
    buf: &mut Buffer,
    series: &[ChartSeries],
    kind: ChartKind,
    theme: &Theme,
    color_keys: &[&str],
    show_legend: bool,
) {
    let populated: Vec<&ChartSeries> = series.iter().filter(|s| !s.points.is_empty()).collect();
    if populated.is_empty() {
        Paragraph::new("No data points for this selection")
            .style(Style::default().fg(theme.get("text_secondary")))
            .centered()
            .render(area, buf);
        return;
    }

    // Area has no dedicated GraphType; a braille bar fill from zero reads as
    // an area in a cell grid.
    let (graph_type, marker) = match kind {
        ChartKind::Line => (GraphType::Line, symbols::Marker::Braille),
        ChartKind::Area => (GraphType::Bar, symbols::Marker::Braille),
        ChartKind::Bar => (GraphType::Bar, symbols::Marker::HalfBlock),
    };

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for s in &populated {
        for &(x, y) in &s.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    // Bar and area draw from (x, 0); ensure 0 is inside the y bounds.
    let y_min_bounds = match kind {
        ChartKind::Bar | ChartKind::Area => 0.0_f64.min(y_min),
        ChartKind::Line => y_min,
    };
    let y_max_bounds = if y_max > y_min_bounds {
        y_max
    } else {
        y_min_bounds + 1.0
    };
    let (x_min_bounds, x_max_bounds) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 0.5, x_min + 0.5)
    };

    let datasets: Vec<Dataset> = populated
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let key = color_keys[i % color_keys.len()];
            Dataset::default()
                .name(s.name.as_str())
                .marker(marker)
                .graph_type(graph_type)
                .style(Style::default().fg(theme.get(key)))
                .data(&s.points)
        })
        .collect();

    let axis_label_style = Style::default().fg(theme.get("text_primary"));
    let x_labels = vec![
        Span::styled(format_year(x_min_bounds), axis_label_style),
        Span::styled(
            format_year((x_min_bounds + x_max_bounds) / 2.0),
            axis_label_style,
        ),
        Span::styled(format_year(x_max_bounds), axis_label_style),
    ];
    let y_labels = vec![
        Span::styled(format_value(y_min_bounds), axis_label_style),
        Span::styled(
            format_value((y_min_bounds + y_max_bounds) / 2.0),
            axis_label_style,
        ),
        Span::styled(format_value(y_max_bounds), axis_label_style),
    ];

    let x_axis = Axis::default()
        .bounds([x_min_bounds, x_max_bounds])
        .style(Style::default().fg(theme.get("text_primary")))
        .labels(x_labels);
    let y_axis = Axis::default()
        .bounds([y_min_bounds, y_max_bounds])
        .style(Style::default().fg(theme.get("text_primary")))
        .labels(y_labels);

    let mut chart = Chart::new(datasets).x_axis(x_axis).y_axis(y_axis);
    if show_legend {
        chart = chart.legend_position(Some(LegendPosition::TopRight));
    } else {
        chart = chart.legend_position(None);
    }
    chart.render(area, buf);
}

fn format_year(v: f64) -> String {
    format!("{:.0}", v)
}

fn format_value(v: f64) -> String {
    if v.abs() >= 1e6 || (v.abs() < 1e-2 && v != 0.0) {
        format!("{:.2e}", v)
    } else {
        format!("{:.2}", v)
    }
}
