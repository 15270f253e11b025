//! Shape dispatch for dataset-processing stages.

use polars::prelude::DataFrame;

use revu_model::{Error, Result};

use crate::chunked::{CacheConfig, run_chunked};
use crate::value::PipelineValue;

/// A stage that transforms tabular data.
///
/// Implementors supply a whole-dataset operation and a per-chunk
/// operation; [`dispatch`] picks one based on the run-time shape of the
/// incoming value. Requiring both operations at the trait level makes a
/// half-implemented stage a compile error rather than a run-time surprise.
pub trait TabularStage {
    fn name(&self) -> &str;

    /// Chunk-runner configuration (cache directory and execution mode).
    fn cache(&self) -> &CacheConfig;

    /// Transform one materialized dataset.
    fn process_table(&self, df: DataFrame) -> Result<DataFrame>;

    /// Transform one chunk of a larger dataset.
    ///
    /// Runs with no cross-chunk state: whatever the operation detects or
    /// removes, it detects or removes within the chunk alone.
    fn process_chunk(&self, chunk: DataFrame) -> Result<DataFrame>;
}

/// Drive a [`TabularStage`] from a pipeline value.
///
/// Materialized tables go through the whole-dataset operation; chunk
/// streams are consolidated by the chunk runner. Any other shape fails
/// with an error naming the stage and the unsupported shape.
pub fn dispatch<S: TabularStage + ?Sized>(stage: &S, input: PipelineValue) -> Result<PipelineValue> {
    match input {
        PipelineValue::Table(df) => stage.process_table(df).map(PipelineValue::Table),
        PipelineValue::Chunks(chunks) => run_chunked(
            stage.name(),
            stage.cache(),
            |chunk| stage.process_chunk(chunk),
            chunks,
        )
        .map(PipelineValue::Table),
        other => Err(Error::UnsupportedInput {
            stage: stage.name().to_string(),
            found: other.kind(),
        }),
    }
}
