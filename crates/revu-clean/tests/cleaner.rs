//! Cleaning-stage behavior over whole datasets and chunk streams.

use polars::prelude::{AnyValue, Column, DataFrame};

use revu_clean::{ReviewCleaner, clean_frame};
use revu_ingest::{any_to_i64, any_to_string};
use revu_model::{CleanOptions, Error, MISSING_MARKER};
use revu_pipeline::{CacheConfig, ChunkStream, PipelineValue, Stage};

fn review_df(rows: &[(i64, &str, Option<&str>, i64)]) -> DataFrame {
    let app_ids: Vec<i64> = rows.iter().map(|row| row.0).collect();
    let names: Vec<String> = rows.iter().map(|row| row.1.to_string()).collect();
    let texts: Vec<Option<String>> = rows.iter().map(|row| row.2.map(String::from)).collect();
    let scores: Vec<i64> = rows.iter().map(|row| row.3).collect();
    DataFrame::new(vec![
        Column::new("app_id".into(), app_ids),
        Column::new("app_name".into(), names),
        Column::new("review_text".into(), texts),
        Column::new("review_score".into(), scores),
    ])
    .unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<String> {
    let column = df.column(name).unwrap();
    (0..df.height())
        .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

fn integers(df: &DataFrame, name: &str) -> Vec<i64> {
    let column = df.column(name).unwrap();
    (0..df.height())
        .map(|idx| any_to_i64(column.get(idx).unwrap_or(AnyValue::Null)).unwrap())
        .collect()
}

fn booleans(df: &DataFrame, name: &str) -> Vec<bool> {
    let column = df.column(name).unwrap();
    (0..df.height())
        .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Boolean(b) => b,
            other => panic!("unexpected value: {other:?}"),
        })
        .collect()
}

#[test]
fn missing_required_column_is_rejected() {
    let df = DataFrame::new(vec![
        Column::new("app_id".into(), vec![1i64]),
        Column::new("app_name".into(), vec!["Alpha"]),
        Column::new("review_text".into(), vec!["fine"]),
    ])
    .unwrap();

    let error = clean_frame(&CleanOptions::default(), df).unwrap_err();

    match error {
        Error::MissingColumns { missing } => {
            assert_eq!(missing, vec!["review_score".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn extra_columns_are_projected_away() {
    let mut df = review_df(&[(1, "Alpha", Some("good game"), 1)]);
    df.with_column(Column::new("extra".into(), vec!["x"])).unwrap();

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert!(cleaned.column("extra").is_err());
    assert!(cleaned.column("app_id").is_ok());
}

#[test]
fn zero_one_labels_pass_through_unchanged() {
    let df = review_df(&[
        (1, "Alpha", Some("good game"), 1),
        (2, "Beta", Some("bad game"), 0),
    ]);

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert_eq!(integers(&cleaned, "review_score"), vec![1, 0]);
}

#[test]
fn negative_labels_remap_to_zero() {
    let df = review_df(&[
        (1, "Alpha", Some("good game"), -1),
        (2, "Beta", Some("bad game"), 1),
        (3, "Gamma", Some("meh game"), -1),
    ]);

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert_eq!(integers(&cleaned, "review_score"), vec![0, 1, 0]);
}

#[test]
fn three_distinct_labels_are_rejected() {
    let df = review_df(&[
        (1, "Alpha", Some("a review"), 0),
        (2, "Beta", Some("b review"), 1),
        (3, "Gamma", Some("c review"), 2),
    ]);

    let error = clean_frame(&CleanOptions::default(), df).unwrap_err();

    match error {
        Error::LabelScheme { values } => {
            assert_eq!(values, vec!["0".to_string(), "1".into(), "2".into()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn two_values_outside_the_schemes_are_rejected() {
    let df = review_df(&[
        (1, "Alpha", Some("a review"), 1),
        (2, "Beta", Some("b review"), 2),
    ]);

    assert!(matches!(
        clean_frame(&CleanOptions::default(), df).unwrap_err(),
        Error::LabelScheme { .. }
    ));
}

#[test]
fn null_scores_are_rejected() {
    let df = DataFrame::new(vec![
        Column::new("app_id".into(), vec![1i64, 2]),
        Column::new("app_name".into(), vec!["Alpha", "Beta"]),
        Column::new("review_text".into(), vec!["good", "bad"]),
        Column::new("review_score".into(), vec![Some(1i64), None]),
    ])
    .unwrap();

    let error = clean_frame(&CleanOptions::default(), df).unwrap_err();

    match error {
        Error::LabelScheme { values } => assert!(values.contains(&"null".to_string())),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn url_extraction_round_trips() {
    let df = review_df(&[(1, "Alpha", Some("check http://example.com now"), 1)]);

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert_eq!(strings(&cleaned, "urls"), vec!["http://example.com"]);
    assert_eq!(booleans(&cleaned, "contains_url"), vec![true]);
    let text = &strings(&cleaned, "review_text")[0];
    assert!(!text.contains("http"));
    assert!(!text.contains("example"));
    assert_eq!(
        strings(&cleaned, "raw_text"),
        vec!["check http://example.com now"]
    );
}

#[test]
fn url_columns_are_absent_when_disabled() {
    let df = review_df(&[(1, "Alpha", Some("visit www.example.com today"), 1)]);
    let options = CleanOptions::default()
        .with_extract_urls(false)
        .with_keep_raw_text(false);

    let cleaned = clean_frame(&options, df).unwrap();

    assert!(cleaned.column("urls").is_err());
    assert!(cleaned.column("contains_url").is_err());
    assert!(cleaned.column("raw_text").is_err());
    // The URL is still stripped from the text itself.
    assert!(!strings(&cleaned, "review_text")[0].contains("example"));
}

#[test]
fn empty_reviews_are_dropped_by_default() {
    let df = review_df(&[
        (1, "Alpha", Some("solid game"), 1),
        (2, "Beta", Some("!!!"), 0),
    ]);

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert_eq!(cleaned.height(), 1);
    assert_eq!(integers(&cleaned, "app_id"), vec![1]);
}

#[test]
fn empty_reviews_are_kept_when_disabled() {
    let df = review_df(&[
        (1, "Alpha", Some("solid game"), 1),
        (2, "Beta", Some("!!!"), 0),
    ]);
    let options = CleanOptions::default().with_drop_empty_reviews(false);

    let cleaned = clean_frame(&options, df).unwrap();

    assert_eq!(cleaned.height(), 2);
    assert_eq!(integers(&cleaned, "word_counts"), vec![2, 0]);
    assert_eq!(integers(&cleaned, "review_length"), vec![10, 0]);
}

#[test]
fn duplicate_rows_are_dropped_keeping_the_first() {
    let df = review_df(&[
        (1, "Alpha", Some("good game"), 1),
        (1, "Alpha", Some("good game"), 1),
        (2, "Beta", Some("good game"), 1),
    ]);

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert_eq!(integers(&cleaned, "app_id"), vec![1, 2]);
}

#[test]
fn duplicate_rows_survive_when_disabled() {
    let df = review_df(&[
        (1, "Alpha", Some("good game"), 1),
        (1, "Alpha", Some("good game"), 1),
    ]);
    let options = CleanOptions::default().with_drop_duplicates(false);

    let cleaned = clean_frame(&options, df).unwrap();

    assert_eq!(cleaned.height(), 2);
}

#[test]
fn blank_reviews_are_dropped_with_the_text_rows() {
    let df = review_df(&[
        (1, "Alpha", Some("   "), 1),
        (2, "Beta", None, 1),
        (3, "Gamma", Some("a keeper"), 1),
    ]);

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert_eq!(integers(&cleaned, "app_id"), vec![3]);
}

#[test]
fn missing_text_gets_the_sentinel_when_kept() {
    let df = review_df(&[(1, "Alpha", None, 1)]);
    let options = CleanOptions::default()
        .with_drop_missing_text(false)
        .with_drop_empty_reviews(false);

    let cleaned = clean_frame(&options, df).unwrap();

    assert_eq!(strings(&cleaned, "raw_text"), vec![MISSING_MARKER]);
    // The sentinel itself goes through normalization like any other text.
    assert_eq!(strings(&cleaned, "review_text"), vec!["missing"]);
    assert_eq!(integers(&cleaned, "word_counts"), vec![1]);
}

#[test]
fn numbers_keep_their_decimal_points() {
    let df = review_df(&[(1, "Alpha", Some("Rated 3.5 out of 5."), 1)]);

    let cleaned = clean_frame(&CleanOptions::default(), df).unwrap();

    assert_eq!(strings(&cleaned, "review_text"), vec!["rated 3.5 out of 5"]);
}

#[test]
fn chunked_execution_matches_whole_dataset_execution() {
    let rows = [
        (1i64, "Alpha", Some("loved it. see http://example.com"), 1i64),
        (2, "Beta", Some("not great, not terrible"), 0),
        (3, "Gamma", Some("would play again"), 1),
        (4, "Delta", Some("refund requested"), 0),
    ];
    let whole = clean_frame(&CleanOptions::default(), review_df(&rows)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let cleaner = ReviewCleaner::new(
        CleanOptions::default(),
        CacheConfig::new(dir.path()).unwrap(),
    );
    let chunks = ChunkStream::from_frames(vec![review_df(&rows[..2]), review_df(&rows[2..])]);
    let chunked = cleaner
        .step(PipelineValue::Chunks(chunks))
        .unwrap()
        .into_table("test")
        .unwrap();

    assert_eq!(chunked, whole);
}

#[test]
fn chunk_failure_leaves_no_artifact_behind() {
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheConfig::new(dir.path()).unwrap();
    let artifact = cache.artifact_path("clean_reviews");
    let cleaner = ReviewCleaner::new(CleanOptions::default(), cache);

    let chunks = ChunkStream::from_frames(vec![
        review_df(&[(1, "Alpha", Some("fine game"), 1)]),
        // Three distinct labels in one chunk: the cleaning op fails here.
        review_df(&[
            (2, "Beta", Some("a"), 0),
            (3, "Gamma", Some("b"), 1),
            (4, "Delta", Some("c"), 2),
        ]),
    ]);

    let result = cleaner.step(PipelineValue::Chunks(chunks));

    assert!(result.is_err());
    assert!(!artifact.exists());
}
