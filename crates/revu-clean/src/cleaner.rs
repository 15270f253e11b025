//! The review-cleaning stage.

use std::collections::BTreeSet;

use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, DataType, IntoLazy, NamedFrom, NewChunkedArray,
    Series, col, lit,
};

use revu_ingest::{any_to_i64, any_to_string};
use revu_model::{CleanOptions, Error, MISSING_MARKER, Result};
use revu_pipeline::{CacheConfig, PipelineValue, Stage, TabularStage, dispatch};
use tracing::debug;

use crate::text::{normalize_text, word_count};
use crate::urls::{find_urls, strip_urls};

/// Columns every review dataset must carry, in output order.
pub const REQUIRED_COLUMNS: [&str; 4] = ["app_id", "app_name", "review_text", "review_score"];

/// Validates, deduplicates, re-encodes, and normalizes review datasets.
///
/// Under chunked execution every pass runs per chunk: duplicates are only
/// detected within one chunk, and the label scheme is checked against the
/// values that chunk happens to contain.
pub struct ReviewCleaner {
    options: CleanOptions,
    cache: CacheConfig,
}

impl ReviewCleaner {
    pub fn new(options: CleanOptions, cache: CacheConfig) -> Self {
        Self { options, cache }
    }

    pub fn options(&self) -> &CleanOptions {
        &self.options
    }
}

impl TabularStage for ReviewCleaner {
    fn name(&self) -> &str {
        "clean_reviews"
    }

    fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    fn process_table(&self, df: DataFrame) -> Result<DataFrame> {
        clean_frame(&self.options, df)
    }

    fn process_chunk(&self, chunk: DataFrame) -> Result<DataFrame> {
        clean_frame(&self.options, chunk)
    }
}

impl Stage for ReviewCleaner {
    fn name(&self) -> &str {
        TabularStage::name(self)
    }

    fn step(&self, input: PipelineValue) -> Result<PipelineValue> {
        dispatch(self, input)
    }
}

/// Run the full cleaning pass over one frame.
pub fn clean_frame(options: &CleanOptions, df: DataFrame) -> Result<DataFrame> {
    let mut df = select_required(df)?;
    if options.drop_duplicates {
        df = drop_duplicate_rows(&df)?;
    }
    df = if options.drop_missing_text {
        drop_blank_reviews(&df)?
    } else {
        fill_missing_values(df)?
    };
    normalize_labels(&mut df)?;

    let texts = column_strings(&df, "review_text")?;
    if options.extract_urls {
        let matches: Vec<Vec<String>> = texts.iter().map(|text| find_urls(text)).collect();
        // Space-joined so the column survives the CSV cache round trip;
        // the pattern never matches whitespace, so the join is lossless.
        let joined: Vec<String> = matches.iter().map(|urls| urls.join(" ")).collect();
        let has_url: Vec<bool> = matches.iter().map(|urls| !urls.is_empty()).collect();
        df.with_column(Series::new("urls".into(), joined))?;
        df.with_column(Series::new("contains_url".into(), has_url))?;
    }
    if options.keep_raw_text {
        df.with_column(Series::new("raw_text".into(), texts.clone()))?;
    }

    let normalized: Vec<String> = texts
        .iter()
        .map(|text| normalize_text(&strip_urls(text)))
        .collect();
    let lengths: Vec<i64> = normalized
        .iter()
        .map(|text| text.chars().count() as i64)
        .collect();
    let words: Vec<i64> = normalized
        .iter()
        .map(|text| word_count(text) as i64)
        .collect();
    df.with_column(Series::new("review_text".into(), normalized))?;
    df.with_column(Series::new("review_length".into(), lengths))?;
    df.with_column(Series::new("word_counts".into(), words.clone()))?;

    if options.drop_empty_reviews {
        let keep: Vec<bool> = words.iter().map(|count| *count > 0).collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        df = df.filter(&mask)?;
    }
    debug!(rows = df.height(), "frame cleaned");
    Ok(df)
}

/// Check the required columns are present and project down to them.
fn select_required(df: DataFrame) -> Result<DataFrame> {
    let present: BTreeSet<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns { missing });
    }
    Ok(df.select(REQUIRED_COLUMNS)?)
}

/// Remove exact duplicate rows, keeping the first occurrence.
fn drop_duplicate_rows(df: &DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let columns: Vec<&Column> = REQUIRED_COLUMNS
        .iter()
        .map(|name| df.column(name))
        .collect::<std::result::Result<_, _>>()?;
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut composite = String::new();
        for (pos, column) in columns.iter().enumerate() {
            if pos > 0 {
                composite.push('\u{1f}');
            }
            composite.push_str(&any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        keep.push(seen.insert(composite));
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Remove rows whose review text is null or blank.
fn drop_blank_reviews(df: &DataFrame) -> Result<DataFrame> {
    let texts = df.column("review_text")?;
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(texts.get(idx).unwrap_or(AnyValue::Null));
        keep.push(!value.trim().is_empty());
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Substitute the missing-value marker for nulls in string columns.
///
/// Integer columns cannot hold the marker; a null score instead surfaces
/// as a label-scheme violation.
fn fill_missing_values(df: DataFrame) -> Result<DataFrame> {
    let targets: Vec<_> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::String)
        .map(|column| col(column.name().as_str()).fill_null(lit(MISSING_MARKER)))
        .collect();
    if targets.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(targets).collect()?)
}

/// Re-encode `review_score` into the canonical `{0, 1}` scheme.
///
/// The distinct values must form a subset of `{0, 1}` or `{-1, 1}`; in
/// the latter case -1 maps to 0. Anything else, including nulls and
/// non-integral values, is a label-scheme violation.
fn normalize_labels(df: &mut DataFrame) -> Result<()> {
    let scores = df.column("review_score")?;
    let height = df.height();
    let mut distinct: BTreeSet<i64> = BTreeSet::new();
    let mut invalid: BTreeSet<String> = BTreeSet::new();
    let mut values: Vec<i64> = Vec::with_capacity(height);
    for idx in 0..height {
        let raw = scores.get(idx).unwrap_or(AnyValue::Null);
        match any_to_i64(raw.clone()) {
            Some(score) => {
                distinct.insert(score);
                values.push(score);
            }
            None => {
                invalid.insert(label_display(&raw));
            }
        }
    }
    if !invalid.is_empty() || distinct.len() > 2 {
        return Err(label_scheme_error(&distinct, &invalid));
    }

    let canonical: Vec<i64> = if distinct.iter().all(|v| *v == -1 || *v == 1) {
        values
            .iter()
            .map(|v| if *v == -1 { 0 } else { *v })
            .collect()
    } else if distinct.iter().all(|v| *v == 0 || *v == 1) {
        values
    } else {
        return Err(label_scheme_error(&distinct, &invalid));
    };
    df.with_column(Series::new("review_score".into(), canonical))?;
    Ok(())
}

fn label_display(value: &AnyValue<'_>) -> String {
    if matches!(value, AnyValue::Null) {
        "null".to_string()
    } else {
        any_to_string(value.clone())
    }
}

fn label_scheme_error(distinct: &BTreeSet<i64>, invalid: &BTreeSet<String>) -> Error {
    let mut values: Vec<String> = distinct.iter().map(ToString::to_string).collect();
    values.extend(invalid.iter().cloned());
    Error::LabelScheme { values }
}

/// Extract a column as plain strings; nulls become empty strings.
fn column_strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}
