//! Pipeline wiring for the clean command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use revu_clean::ReviewCleaner;
use revu_ingest::{ReadCsv, WriteCsv, should_stream};
use revu_model::CleanOptions;
use revu_pipeline::{CacheConfig, ChunkMode, Pipeline, PipelineValue, Stage};

use crate::cli::Cli;

/// Default rows per chunk when large inputs stream automatically.
pub const DEFAULT_CHUNK_ROWS: usize = 50_000;

/// Outcome of one cleaning run, for the summary table.
#[derive(Debug)]
pub struct CleanResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub execution: String,
    pub duration_ms: u128,
}

/// Run the read -> clean -> write pipeline described by the CLI flags.
pub fn run_clean(cli: &Cli) -> Result<CleanResult> {
    let start = Instant::now();
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input));

    let options = CleanOptions::default()
        .with_extract_urls(!cli.no_urls)
        .with_drop_duplicates(!cli.keep_duplicates)
        .with_drop_missing_text(!cli.keep_missing_text)
        .with_drop_empty_reviews(!cli.keep_empty_reviews)
        .with_keep_raw_text(!cli.no_raw_text);

    let mode = if cli.in_memory {
        ChunkMode::InMemory
    } else {
        ChunkMode::CacheBacked
    };
    let cache = CacheConfig::new(&cli.cache_dir)
        .with_context(|| format!("create cache dir {}", cli.cache_dir.display()))?
        .with_mode(mode);

    let chunk_size = chunk_rows(cli);
    let mut reader = ReadCsv::new();
    if let Some(rows) = chunk_size {
        reader = reader.with_chunk_size(rows);
    }
    let execution = describe_execution(chunk_size, mode);

    let pipeline = Pipeline::new()
        .then(reader)
        .then(ReviewCleaner::new(options, cache));
    info!("{}", pipeline.sequence());

    let cleaned = pipeline
        .run(PipelineValue::Path(cli.input.clone()))?
        .into_table("clean_reviews")?;
    let rows = cleaned.height();
    let columns = cleaned.width();

    WriteCsv::new(&output)
        .step(PipelineValue::Table(cleaned))
        .with_context(|| format!("write {}", output.display()))?;

    Ok(CleanResult {
        input: cli.input.clone(),
        output,
        rows,
        columns,
        execution,
        duration_ms: start.elapsed().as_millis(),
    })
}

/// Chunk size to use, if any: an explicit `--chunk-size` wins, otherwise
/// large files default to chunked execution unless `--whole-file` is set.
fn chunk_rows(cli: &Cli) -> Option<usize> {
    if cli.whole_file {
        return None;
    }
    if cli.chunk_size.is_some() {
        return cli.chunk_size;
    }
    if should_stream(&cli.input) {
        Some(DEFAULT_CHUNK_ROWS)
    } else {
        None
    }
}

fn describe_execution(chunk_size: Option<usize>, mode: ChunkMode) -> String {
    match (chunk_size, mode) {
        (None, _) => "whole file".to_string(),
        (Some(rows), ChunkMode::CacheBacked) => format!("chunks of {rows} rows, cache-backed"),
        (Some(rows), ChunkMode::InMemory) => format!("chunks of {rows} rows, in-memory"),
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("reviews");
    input.with_file_name(format!("{stem}_clean.csv"))
}
