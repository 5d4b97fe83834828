use edudash::{CsvOptions, Dataset, SourcePaths};
use polars::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Observations with a messy join key, a free-text column to drop, and one
/// indicator with no metadata entry. Metadata headers are upper-case, as the
/// raw files ship.
fn sample_sources(dir: &TempDir) -> SourcePaths {
    let mut obs = df!(
        "indicator_id" => &[" ner.02.cp ", "NER.02.CP", "xgdp.fsgov", "MYSTERY.1"],
        "country_id" => &["NPL", "USA", "NPL", "EST"],
        "year" => &[2010i64, 2010, 2011, 2012],
        "value" => &[10.0f64, 20.0, 3.5, 7.0],
        "indicator_desc" => &["free", "text", "goes", "away"]
    )
    .unwrap();
    let mut meta = df!(
        "INDICATOR_ID" => &["NER.02.CP", "XGDP.FSGOV"],
        "INDICATOR_LABEL_EN" => &[
            "Net enrolment rate, pre-primary",
            "Government expenditure on education"
        ]
    )
    .unwrap();
    SourcePaths {
        observations: write_csv(dir, "obs.csv", &mut obs),
        metadata: write_csv(dir, "meta.csv", &mut meta),
    }
}

#[test]
fn left_join_never_drops_observation_rows() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::load(&sample_sources(&dir), &CsvOptions::default()).unwrap();
    assert_eq!(dataset.num_rows(), 4);
}

#[test]
fn join_key_is_upper_cased_and_trimmed() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::load(&sample_sources(&dir), &CsvOptions::default()).unwrap();
    let df = dataset
        .lazy()
        .filter(col("indicator_id").eq(lit("NER.02.CP")))
        .collect()
        .unwrap();
    assert_eq!(df.height(), 2);
}

#[test]
fn matched_rows_carry_the_label() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::load(&sample_sources(&dir), &CsvOptions::default()).unwrap();
    let df = dataset
        .lazy()
        .filter(col("indicator_id").eq(lit("XGDP.FSGOV")))
        .collect()
        .unwrap();
    let labels = df.column("indicator_label_en").unwrap().str().unwrap();
    assert_eq!(
        labels.get(0),
        Some("Government expenditure on education")
    );
}

#[test]
fn unmatched_rows_survive_with_a_null_label() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::load(&sample_sources(&dir), &CsvOptions::default()).unwrap();
    let df = dataset
        .lazy()
        .filter(col("indicator_id").eq(lit("MYSTERY.1")))
        .collect()
        .unwrap();
    assert_eq!(df.height(), 1);
    let labels = df.column("indicator_label_en").unwrap().str().unwrap();
    assert_eq!(labels.get(0), None);
}

#[test]
fn free_text_column_is_dropped() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::load(&sample_sources(&dir), &CsvOptions::default()).unwrap();
    let df = dataset.lazy().collect().unwrap();
    assert!(df.column("indicator_desc").is_err());
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let obs_path = dir.path().join("obs.csv");
    // No value column.
    std::fs::write(&obs_path, "indicator_id,country_id,year\nA,NPL,2010\n").unwrap();
    let meta_path = dir.path().join("meta.csv");
    std::fs::write(&meta_path, "INDICATOR_ID,INDICATOR_LABEL_EN\nA,label\n").unwrap();

    let paths = SourcePaths {
        observations: obs_path,
        metadata: meta_path,
    };
    let err = Dataset::load(&paths, &CsvOptions::default()).unwrap_err();
    assert!(err.to_string().contains("value"));
    assert!(err.to_string().contains("obs.csv"));
}

#[test]
fn missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let paths = SourcePaths {
        observations: dir.path().join("nope.csv"),
        metadata: dir.path().join("also_nope.csv"),
    };
    assert!(Dataset::load(&paths, &CsvOptions::default()).is_err());
}

#[test]
fn custom_delimiter_is_honored() {
    let dir = TempDir::new().unwrap();
    let obs_path = dir.path().join("obs.csv");
    std::fs::write(
        &obs_path,
        "indicator_id;country_id;year;value\nA;NPL;2010;1.5\n",
    )
    .unwrap();
    let meta_path = dir.path().join("meta.csv");
    std::fs::write(&meta_path, "indicator_id;indicator_label_en\nA;label\n").unwrap();

    let paths = SourcePaths {
        observations: obs_path,
        metadata: meta_path,
    };
    let options = CsvOptions {
        delimiter: Some(b';'),
    };
    let dataset = Dataset::load(&paths, &options).unwrap();
    assert_eq!(dataset.num_rows(), 1);
}
