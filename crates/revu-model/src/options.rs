//! Cleaning-stage configuration.

use serde::{Deserialize, Serialize};

/// Sentinel substituted for missing values when rows are kept.
pub const MISSING_MARKER: &str = "<MISSING>";

/// Switches for the review-cleaning stage. Everything is enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Attach `urls` and `contains_url` columns extracted from the review text.
    pub extract_urls: bool,

    /// Remove exact duplicate rows, keeping the first occurrence.
    pub drop_duplicates: bool,

    /// Remove rows whose review text is null or blank; when disabled,
    /// missing values in string columns are replaced with [`MISSING_MARKER`].
    pub drop_missing_text: bool,

    /// Remove rows whose normalized review text contains no words.
    pub drop_empty_reviews: bool,

    /// Keep the pre-normalization review text in a `raw_text` column.
    pub keep_raw_text: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            extract_urls: true,
            drop_duplicates: true,
            drop_missing_text: true,
            drop_empty_reviews: true,
            keep_raw_text: true,
        }
    }
}

impl CleanOptions {
    #[must_use]
    pub fn with_extract_urls(mut self, enable: bool) -> Self {
        self.extract_urls = enable;
        self
    }

    #[must_use]
    pub fn with_drop_duplicates(mut self, enable: bool) -> Self {
        self.drop_duplicates = enable;
        self
    }

    #[must_use]
    pub fn with_drop_missing_text(mut self, enable: bool) -> Self {
        self.drop_missing_text = enable;
        self
    }

    #[must_use]
    pub fn with_drop_empty_reviews(mut self, enable: bool) -> Self {
        self.drop_empty_reviews = enable;
        self
    }

    #[must_use]
    pub fn with_keep_raw_text(mut self, enable: bool) -> Self {
        self.keep_raw_text = enable;
        self
    }
}
