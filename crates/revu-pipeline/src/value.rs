//! Run-time values passed between pipeline stages.

use std::fmt;
use std::path::PathBuf;

use polars::prelude::DataFrame;

use revu_model::{Error, Result};

/// A finite, single-pass sequence of row chunks covering one logical
/// dataset in consecutive row order.
///
/// Consuming the stream is destructive: it can only be iterated once.
pub struct ChunkStream {
    chunks: Box<dyn Iterator<Item = Result<DataFrame>>>,
}

impl ChunkStream {
    pub fn new<I>(chunks: I) -> Self
    where
        I: Iterator<Item = Result<DataFrame>> + 'static,
    {
        Self {
            chunks: Box::new(chunks),
        }
    }

    /// Wrap already-materialized chunks.
    pub fn from_frames(frames: Vec<DataFrame>) -> Self {
        Self::new(frames.into_iter().map(Ok))
    }
}

impl Iterator for ChunkStream {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChunkStream")
    }
}

/// The shapes a stage can receive or produce.
///
/// Values are owned and move from stage to stage; a stage returns a new
/// value rather than mutating shared state.
#[derive(Debug)]
pub enum PipelineValue {
    /// A source or destination location on disk.
    Path(PathBuf),
    /// A materialized dataset.
    Table(DataFrame),
    /// A lazy sequence of row chunks.
    Chunks(ChunkStream),
}

impl PipelineValue {
    /// Short shape name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::Table(_) => "table",
            Self::Chunks(_) => "chunk stream",
        }
    }

    /// Unwrap a materialized dataset, failing on any other shape.
    pub fn into_table(self, stage: &str) -> Result<DataFrame> {
        match self {
            Self::Table(df) => Ok(df),
            other => Err(Error::UnsupportedInput {
                stage: stage.to_string(),
                found: other.kind(),
            }),
        }
    }
}
