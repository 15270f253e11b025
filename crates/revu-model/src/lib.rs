//! Shared types for the revu review-cleaning pipeline.

pub mod error;
pub mod options;

pub use error::{Error, Result};
pub use options::{CleanOptions, MISSING_MARKER};
