//! Read-only queries over the merged table. Every function takes a
//! [`LazyFrame`] view and leaves the underlying data untouched.

use color_eyre::Result;
use polars::prelude::*;

use crate::data::{COL_COUNTRY, COL_INDICATOR, COL_LABEL, COL_VALUE, COL_YEAR};

/// A selectable indicator: id plus the human label when metadata matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorOption {
    pub id: String,
    pub label: Option<String>,
}

impl IndicatorOption {
    /// "ID - label", degrading to the bare id when no metadata matched.
    pub fn display(&self) -> String {
        match &self.label {
            Some(label) => format!("{} - {}", self.id, label),
            None => self.id.clone(),
        }
    }
}

/// Rows for one country.
pub fn filter_by_country(lf: LazyFrame, code: &str) -> LazyFrame {
    lf.filter(col(COL_COUNTRY).eq(lit(code)))
}

/// Distinct (indicator_id, label) pairs present in the given rows, sorted
/// ascending by id with duplicates collapsed. Feeds the multiselect on the
/// country pages and the selectbox on the cross page.
pub fn indicator_options(lf: LazyFrame) -> Result<Vec<IndicatorOption>> {
    let df = lf
        .group_by([col(COL_INDICATOR)])
        .agg([col(COL_LABEL).first()])
        .sort_by_exprs(vec![col(COL_INDICATOR)], SortMultipleOptions::default())
        .collect()?;

    let ids = df.column(COL_INDICATOR)?.str()?;
    let labels = df.column(COL_LABEL)?.str()?;
    let mut options = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(id) = ids.get(i) else { continue };
        options.push(IndicatorOption {
            id: id.to_string(),
            label: labels.get(i).map(|s| s.to_string()),
        });
    }
    Ok(options)
}

/// Rows for the caller-selected indicators, or `None` when nothing is
/// selected. The caller surfaces `None` as a user-visible warning; an empty
/// selection is never an error and never an empty chart.
pub fn select_indicators(lf: LazyFrame, ids: &[String]) -> Option<LazyFrame> {
    let mut filter: Option<Expr> = None;
    for id in ids {
        let matches = col(COL_INDICATOR).eq(lit(id.as_str()));
        filter = Some(match filter {
            Some(existing) => existing.or(matches),
            None => matches,
        });
    }
    filter.map(|f| lf.filter(f))
}

/// Rows for one indicator id, trimmed and upper-cased to match the
/// normalized join key, with exact-duplicate rows collapsed.
pub fn filter_by_indicator(lf: LazyFrame, id: &str) -> LazyFrame {
    let id = id.trim().to_uppercase();
    lf.filter(col(COL_INDICATOR).eq(lit(id)))
        .unique_stable(None, UniqueKeepStrategy::First)
}

/// Bar-chart aggregation: mean of value per (year, country), sorted. Normal
/// data has one row per group; duplicates are averaged.
pub fn mean_by_year_country(lf: LazyFrame) -> LazyFrame {
    lf.group_by([col(COL_YEAR), col(COL_COUNTRY)])
        .agg([col(COL_VALUE).mean()])
        .sort_by_exprs(
            vec![col(COL_YEAR), col(COL_COUNTRY)],
            SortMultipleOptions::default(),
        )
}
