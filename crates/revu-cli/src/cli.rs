//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "revu",
    version,
    about = "Clean and normalize review datasets for downstream modeling",
    long_about = "Clean and normalize review datasets for downstream modeling.\n\n\
                  Validates required columns, removes duplicates and empty reviews,\n\
                  re-encodes review scores to {0, 1}, extracts URLs, and normalizes\n\
                  the review text. Large inputs are processed chunk by chunk with\n\
                  bounded memory."
)]
pub struct Cli {
    /// Path to the input CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination for the cleaned CSV (default: `<INPUT stem>_clean.csv`).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Process the input in chunks of this many rows.
    #[arg(long = "chunk-size", value_name = "ROWS")]
    pub chunk_size: Option<usize>,

    /// Process the whole file in one pass, even when it is large.
    #[arg(long = "whole-file", conflicts_with = "chunk_size")]
    pub whole_file: bool,

    /// Consolidate chunk results in memory instead of spilling to disk.
    #[arg(long = "in-memory")]
    pub in_memory: bool,

    /// Directory for intermediate chunk artifacts.
    #[arg(long = "cache-dir", value_name = "DIR", default_value = "data/temp")]
    pub cache_dir: PathBuf,

    /// Skip URL extraction (no `urls`/`contains_url` columns).
    #[arg(long = "no-urls")]
    pub no_urls: bool,

    /// Keep exact duplicate rows.
    #[arg(long = "keep-duplicates")]
    pub keep_duplicates: bool,

    /// Keep rows with missing review text, substituting a sentinel value.
    #[arg(long = "keep-missing-text")]
    pub keep_missing_text: bool,

    /// Keep rows whose normalized review has no words.
    #[arg(long = "keep-empty-reviews")]
    pub keep_empty_reviews: bool,

    /// Skip the `raw_text` copy of the original review text.
    #[arg(long = "no-raw-text")]
    pub no_raw_text: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
