//! Error types shared across the revu crates.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by pipeline composition, execution, and cleaning.
#[derive(Debug, Error)]
pub enum Error {
    /// A stage failed while a pipeline was running; carries the stage name
    /// and the failure it wraps.
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<Error>,
    },

    /// A stage received a run-time shape it cannot process.
    #[error("stage '{stage}' cannot process {found} input")]
    UnsupportedInput { stage: String, found: &'static str },

    /// The dataset lacks one or more required columns.
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// `review_score` does not follow one of the two recognized encodings.
    #[error("review_score must be encoded as {{0, 1}} or {{-1, 1}}, got {{{}}}", values.join(", "))]
    LabelScheme { values: Vec<String> },

    /// The input location does not exist.
    #[error("source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl Error {
    /// Wrap this failure with the name of the stage it came from.
    #[must_use]
    pub fn in_stage(self, stage: &str) -> Self {
        Self::Stage {
            stage: stage.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
