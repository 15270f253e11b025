//! Shared URL matcher for review text.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `http(s)://` URLs, `www.`-prefixed hosts, and bare
/// `domain.tld/` references, case-insensitively. The final character
/// class keeps trailing punctuation out of the match.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b((?:https?://|www\d{0,3}\.|[a-z0-9.\-]+\.[a-z]{2,4}/)(?:[^\s()<>]+|\([^\s()<>]*\))+(?:\([^\s()<>]*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#,
    )
    .expect("invalid url pattern")
});

/// Collect every URL-like substring of `text`, in order of appearance.
pub fn find_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Remove every URL-like substring and trim the remainder.
pub fn strip_urls(text: &str) -> String {
    URL_PATTERN.replace_all(text, "").trim().to_string()
}
