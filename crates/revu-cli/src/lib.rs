//! CLI wiring for the revu review-cleaning pipeline.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
