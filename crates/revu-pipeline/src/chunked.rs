//! Chunk-at-a-time execution with optional disk spill.
//!
//! The runner applies a stage's per-chunk operation to every chunk of a
//! [`ChunkStream`] and consolidates the results into one frame. In
//! cache-backed mode the transformed chunks stream through an on-disk CSV
//! artifact, so peak memory stays around one chunk regardless of dataset
//! size; in-memory mode stacks the chunks directly.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{
    CsvReadOptions, CsvWriter, DataFrame, DataType, IntoLazy, SerReader, SerWriter, col, lit,
};

use revu_model::Result;
use tracing::{debug, info, warn};

use crate::value::ChunkStream;

/// How the chunk runner consolidates per-chunk results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkMode {
    /// Stream transformed chunks through an on-disk artifact.
    #[default]
    CacheBacked,
    /// Accumulate transformed chunks in memory and stack them at the end.
    InMemory,
}

/// Chunk-runner configuration carried by each tabular stage.
///
/// The cache directory is created when the configuration is built and is
/// never torn down; only the per-run artifact inside it is removed.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    dir: PathBuf,
    mode: ChunkMode,
}

impl CacheConfig {
    /// Default directory for intermediate artifacts.
    pub const DEFAULT_DIR: &'static str = "data/temp";

    /// Build a configuration rooted at `dir`, creating the directory if it
    /// does not exist yet. Repeated construction over the same directory
    /// is fine.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            mode: ChunkMode::default(),
        })
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ChunkMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> ChunkMode {
        self.mode
    }

    /// Path of the intermediate artifact for a stage.
    ///
    /// Derived from the stage name alone, so two concurrent runs of the
    /// same named stage would collide on it.
    pub fn artifact_path(&self, stage: &str) -> PathBuf {
        self.dir.join(format!("{stage}_chunks.csv"))
    }
}

/// Apply `op` to every chunk in iteration order and consolidate the
/// results into one frame.
///
/// Rows follow chunk order; nothing is reordered or deduplicated across
/// chunk boundaries. A failing chunk aborts the run immediately, and in
/// cache-backed mode the artifact is removed on every exit path. An empty
/// stream yields an empty frame.
pub fn run_chunked<F>(
    stage: &str,
    cache: &CacheConfig,
    op: F,
    chunks: ChunkStream,
) -> Result<DataFrame>
where
    F: FnMut(DataFrame) -> Result<DataFrame>,
{
    match cache.mode() {
        ChunkMode::CacheBacked => run_cache_backed(stage, cache, op, chunks),
        ChunkMode::InMemory => run_in_memory(stage, op, chunks),
    }
}

fn run_in_memory<F>(stage: &str, mut op: F, chunks: ChunkStream) -> Result<DataFrame>
where
    F: FnMut(DataFrame) -> Result<DataFrame>,
{
    let mut combined: Option<DataFrame> = None;
    let mut count = 0usize;
    for chunk in chunks {
        let done = op(chunk?)?;
        debug!(stage, chunk = count, rows = done.height(), "chunk processed");
        match combined.as_mut() {
            Some(all) => {
                all.vstack_mut(&done)?;
            }
            None => combined = Some(done),
        }
        count += 1;
    }
    let df = combined.unwrap_or_default();
    info!(stage, chunks = count, rows = df.height(), "all chunks processed");
    Ok(df)
}

fn run_cache_backed<F>(
    stage: &str,
    cache: &CacheConfig,
    mut op: F,
    chunks: ChunkStream,
) -> Result<DataFrame>
where
    F: FnMut(DataFrame) -> Result<DataFrame>,
{
    let artifact = CacheArtifact::new(cache.artifact_path(stage));
    let mut file = File::create(artifact.path())?;
    let mut count = 0usize;
    for chunk in chunks {
        let mut done = op(chunk?)?;
        CsvWriter::new(&mut file)
            .include_header(count == 0)
            .finish(&mut done)?;
        debug!(stage, chunk = count, rows = done.height(), "chunk spilled");
        count += 1;
    }
    drop(file);
    if count == 0 {
        return Ok(DataFrame::default());
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(artifact.path().to_path_buf()))?
        .finish()?;
    let df = restore_empty_strings(df)?;
    info!(stage, chunks = count, rows = df.height(), "all chunks processed");
    Ok(df)
}

/// CSV cannot tell an empty string from a missing value, so string nulls
/// coming back from the artifact are restored to empty strings. This keeps
/// cache-backed output row-equal to in-memory output.
fn restore_empty_strings(df: DataFrame) -> Result<DataFrame> {
    let targets: Vec<_> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::String)
        .map(|column| col(column.name().as_str()).fill_null(lit("")))
        .collect();
    if targets.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(targets).collect()?)
}

/// Scoped handle to the on-disk intermediate file.
///
/// Removal happens on drop, so every exit path cleans up, including chunk
/// failures. A failed removal is logged and never escalated.
struct CacheArtifact {
    path: PathBuf,
}

impl CacheArtifact {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheArtifact {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(error) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %error, "failed to remove chunk cache file");
        }
    }
}
