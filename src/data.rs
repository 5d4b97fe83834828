//! Load the two delimited sources and build the merged table.
//!
//! The merge is a left join of observations onto indicator metadata on the
//! normalized indicator id: every observation row survives, unmatched ids
//! simply carry a null label. The result is collected once at startup and
//! never mutated afterwards.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Canonical column names in the merged table. Source files may use any
/// letter case for their headers (the raw metadata ships upper-case).
pub const COL_COUNTRY: &str = "country_id";
pub const COL_INDICATOR: &str = "indicator_id";
pub const COL_YEAR: &str = "year";
pub const COL_VALUE: &str = "value";
pub const COL_LABEL: &str = "indicator_label_en";

const OBSERVATION_COLUMNS: [&str; 4] = [COL_INDICATOR, COL_COUNTRY, COL_YEAR, COL_VALUE];
const METADATA_COLUMNS: [&str; 2] = [COL_INDICATOR, COL_LABEL];

/// The two input files.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub observations: PathBuf,
    pub metadata: PathBuf,
}

/// CSV read options shared by both sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvOptions {
    pub delimiter: Option<u8>,
}

fn scan_csv(path: &Path, options: &CsvOptions) -> Result<LazyFrame> {
    let pl_path = PlPath::Local(Arc::from(path));
    let mut reader = LazyCsvReader::new(pl_path);
    if let Some(delimiter) = options.delimiter {
        reader = reader.with_separator(delimiter);
    }
    Ok(reader.finish()?)
}

/// Look up each required column in the frame's header, matching
/// case-insensitively, and return select expressions aliasing them to their
/// canonical names. Selecting only these drops free-text extras such as
/// `indicator_desc`. A missing column is a fatal load error naming the file.
fn required_columns(lf: &LazyFrame, required: &[&str], file: &Path) -> Result<Vec<Expr>> {
    let schema = lf.clone().collect_schema()?;
    let mut exprs = Vec::with_capacity(required.len());
    for want in required {
        let found = schema
            .iter_names()
            .find(|name| name.as_str().eq_ignore_ascii_case(want))
            .ok_or_else(|| {
                eyre!(
                    "{}: required column '{}' not found",
                    file.display(),
                    want
                )
            })?;
        exprs.push(col(found.as_str()).alias(*want));
    }
    Ok(exprs)
}

/// The merged table. Loaded once per session and read-only afterwards; the
/// query layer works on cheap [`LazyFrame`] views of it.
#[derive(Debug)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    /// Read both sources, normalize the join key on the observation side,
    /// and left-join metadata onto observations.
    pub fn load(paths: &SourcePaths, options: &CsvOptions) -> Result<Self> {
        let observations = scan_csv(&paths.observations, options)?;
        let obs_columns =
            required_columns(&observations, &OBSERVATION_COLUMNS, &paths.observations)?;
        let observations = observations.select(obs_columns).with_columns([
            // Join key equality is whitespace- and case-insensitive only
            // because this side is normalized; metadata ids are canonical.
            col(COL_INDICATOR)
                .str()
                .strip_chars(lit(Null {}))
                .str()
                .to_uppercase()
                .alias(COL_INDICATOR),
            col(COL_VALUE).cast(DataType::Float64),
        ]);

        let metadata = scan_csv(&paths.metadata, options)?;
        let meta_columns = required_columns(&metadata, &METADATA_COLUMNS, &paths.metadata)?;
        // One label per id; collapsing duplicates up front keeps the left
        // join from fanning out observation rows.
        let metadata = metadata
            .select(meta_columns)
            .group_by([col(COL_INDICATOR)])
            .agg([col(COL_LABEL).first()]);

        let merged = observations
            .left_join(metadata, col(COL_INDICATOR), col(COL_INDICATOR))
            .collect()?;

        Ok(Self { df: merged })
    }

    /// Lazy view of the merged table for the query layer.
    pub fn lazy(&self) -> LazyFrame {
        self.df.clone().lazy()
    }

    pub fn num_rows(&self) -> usize {
        self.df.height()
    }
}
