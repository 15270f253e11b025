//! File-reading stage.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use revu_model::{Error, Result};
use revu_pipeline::{ChunkStream, PipelineValue, Stage};
use tracing::{debug, error, info};

/// File size (bytes) above which the CLI defaults to chunked execution.
pub const STREAM_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;

/// Reads a CSV file into the pipeline.
///
/// With a chunk size configured, the rows are handed downstream as a
/// chunk stream; otherwise as one materialized table. The source location
/// is validated before any read is attempted.
#[derive(Debug, Clone, Default)]
pub struct ReadCsv {
    chunk_size: Option<usize>,
}

impl ReadCsv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition the input into chunks of `rows` rows.
    #[must_use]
    pub fn with_chunk_size(mut self, rows: usize) -> Self {
        self.chunk_size = Some(rows.max(1));
        self
    }
}

impl Stage for ReadCsv {
    fn name(&self) -> &str {
        if self.chunk_size.is_some() {
            "read_csv_chunked"
        } else {
            "read_csv"
        }
    }

    fn step(&self, input: PipelineValue) -> Result<PipelineValue> {
        let path = match input {
            PipelineValue::Path(path) => path,
            other => {
                return Err(Error::UnsupportedInput {
                    stage: self.name().to_string(),
                    found: other.kind(),
                });
            }
        };
        if !path.exists() {
            return Err(Error::SourceNotFound { path });
        }
        let df = read_frame(&path)?;
        info!(path = %path.display(), rows = df.height(), "read csv");
        match self.chunk_size {
            Some(rows) => Ok(PipelineValue::Chunks(slice_into_chunks(&df, rows))),
            None => Ok(PipelineValue::Table(df)),
        }
    }
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|err| {
            error!(path = %path.display(), operation = "csv read", %err, "read failed");
            err
        })?;
    Ok(df)
}

/// Split a frame into consecutive, order-preserving row ranges.
///
/// The frame is read eagerly and sliced, which keeps chunk boundaries
/// deterministic.
/// TODO: produce chunks from polars' batched CSV reader instead, so large
/// files never materialize whole before chunking.
pub fn slice_into_chunks(df: &DataFrame, rows_per_chunk: usize) -> ChunkStream {
    let total = df.height();
    let rows_per_chunk = rows_per_chunk.max(1);
    let mut frames = Vec::with_capacity(total.div_ceil(rows_per_chunk).max(1));
    let mut offset = 0usize;
    while offset < total {
        let len = rows_per_chunk.min(total - offset);
        frames.push(df.slice(offset as i64, len));
        offset += len;
    }
    debug!(rows = total, chunks = frames.len(), "partitioned into chunks");
    ChunkStream::from_frames(frames)
}

/// Whether a file is large enough that chunked execution is worthwhile.
pub fn should_stream(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path.as_ref())
        .map(|meta| meta.len() >= STREAM_THRESHOLD_BYTES)
        .unwrap_or(false)
}
