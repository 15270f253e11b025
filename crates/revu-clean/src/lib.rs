//! Concrete cleaning stage for review datasets.

pub mod cleaner;
pub mod text;
pub mod urls;

pub use cleaner::{REQUIRED_COLUMNS, ReviewCleaner, clean_frame};
pub use text::normalize_text;
pub use urls::{find_urls, strip_urls};
