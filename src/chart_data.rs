//! Prepare chart data from filtered rows: apply the time window, collect,
//! and convert to per-series (year, value) points for the render layer.

use color_eyre::Result;
use polars::prelude::*;

use crate::data::{COL_COUNTRY, COL_INDICATOR, COL_VALUE, COL_YEAR};
use crate::query;

/// Chart kinds offered on the cross-country page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Area,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Area, ChartKind::Bar];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Area => "Area Chart",
            ChartKind::Bar => "Bar Chart",
        }
    }

    pub fn next(&self) -> ChartKind {
        match self {
            ChartKind::Line => ChartKind::Area,
            ChartKind::Area => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Line,
        }
    }
}

/// Year-window presets, measured back from the newest year in the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    LastFive,
    LastTen,
    #[default]
    All,
}

impl TimeWindow {
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::LastFive => "Last 5 Years",
            TimeWindow::LastTen => "Last 10 Years",
            TimeWindow::All => "All Years",
        }
    }

    fn years(&self) -> Option<i64> {
        match self {
            TimeWindow::LastFive => Some(5),
            TimeWindow::LastTen => Some(10),
            TimeWindow::All => None,
        }
    }

    pub fn next(&self) -> TimeWindow {
        match self {
            TimeWindow::LastFive => TimeWindow::LastTen,
            TimeWindow::LastTen => TimeWindow::All,
            TimeWindow::All => TimeWindow::LastFive,
        }
    }

    /// Restrict rows to the window. `All` passes everything through.
    pub fn apply(&self, lf: LazyFrame) -> LazyFrame {
        match self.years() {
            Some(n) => lf.filter(col(COL_YEAR).gt_eq(col(COL_YEAR).max() - lit(n - 1))),
            None => lf,
        }
    }
}

/// One named series of (year, value) points, sorted by year.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// One line series per indicator, for an individual-country page.
pub fn country_series(lf: LazyFrame, window: TimeWindow) -> Result<Vec<ChartSeries>> {
    series_by_key(window.apply(lf), COL_INDICATOR)
}

/// One series per country, for the cross page. Bar charts use the
/// (year, country) mean aggregation; line and area use the raw rows.
pub fn cross_series(
    lf: LazyFrame,
    kind: ChartKind,
    window: TimeWindow,
) -> Result<Vec<ChartSeries>> {
    let lf = window.apply(lf);
    let lf = match kind {
        ChartKind::Bar => query::mean_by_year_country(lf),
        ChartKind::Line | ChartKind::Area => lf,
    };
    series_by_key(lf, COL_COUNTRY)
}

/// Group rows into one series per distinct key value. Nulls and non-finite
/// points are dropped.
fn series_by_key(lf: LazyFrame, key: &str) -> Result<Vec<ChartSeries>> {
    let df = lf
        .select([
            col(key),
            col(COL_YEAR).cast(DataType::Float64),
            col(COL_VALUE).cast(DataType::Float64),
        ])
        .drop_nulls(None)
        .sort_by_exprs(
            vec![col(key), col(COL_YEAR)],
            SortMultipleOptions::default(),
        )
        .collect()?;

    let keys = df.column(key)?.str()?;
    let years = df.column(COL_YEAR)?.f64()?;
    let values = df.column(COL_VALUE)?.f64()?;

    let mut series: Vec<ChartSeries> = Vec::new();
    for i in 0..df.height() {
        let (Some(name), Some(x), Some(y)) = (keys.get(i), years.get(i), values.get(i))
        else {
            continue;
        };
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        match series.last_mut() {
            Some(last) if last.name == name => last.points.push((x, y)),
            _ => series.push(ChartSeries {
                name: name.to_string(),
                points: vec![(x, y)],
            }),
        }
    }
    Ok(series)
}
